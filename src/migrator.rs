use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_usuarios_table::Migration),
            Box::new(m20240101_000002_create_productos_table::Migration),
            Box::new(m20240101_000003_create_turnos_table::Migration),
            Box::new(m20240101_000004_create_surtidores_table::Migration),
            Box::new(m20240101_000005_create_ventas_productos_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_usuarios_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_usuarios_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Usuarios::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Usuarios::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Usuarios::Nombre).string().not_null())
                        .col(ColumnDef::new(Usuarios::Apellido).string().not_null())
                        .col(ColumnDef::new(Usuarios::Password).string().not_null())
                        .col(
                            ColumnDef::new(Usuarios::Rol)
                                .string_len(20)
                                .not_null()
                                .default("employee"),
                        )
                        .col(
                            ColumnDef::new(Usuarios::Activo)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Usuarios::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_usuarios_nombre")
                        .table(Usuarios::Table)
                        .col(Usuarios::Nombre)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Usuarios::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Usuarios {
        Table,
        Id,
        Nombre,
        Apellido,
        Password,
        Rol,
        Activo,
        CreatedAt,
    }
}

mod m20240101_000002_create_productos_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_productos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Productos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Productos::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Productos::Nombre).string().not_null())
                        .col(ColumnDef::new(Productos::Precio).decimal().not_null())
                        .col(
                            ColumnDef::new(Productos::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Productos::Activo)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Productos::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_productos_nombre")
                        .table(Productos::Table)
                        .col(Productos::Nombre)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Productos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Productos {
        Table,
        Id,
        Nombre,
        Precio,
        Stock,
        Activo,
        CreatedAt,
    }
}

mod m20240101_000003_create_turnos_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_turnos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Turnos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Turnos::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Turnos::Fecha).date().not_null())
                        .col(ColumnDef::new(Turnos::Tipo).string().not_null())
                        .col(ColumnDef::new(Turnos::EncargadoId).integer().not_null())
                        .col(ColumnDef::new(Turnos::EncargadoNombre).string().not_null())
                        .col(ColumnDef::new(Turnos::Estado).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Turnos::FechaApertura)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Turnos::FechaCierre)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_turnos_fecha")
                        .table(Turnos::Table)
                        .col(Turnos::Fecha)
                        .to_owned(),
                )
                .await?;

            // At most one open shift, enforced at the store level. Partial
            // indexes are not expressible through the schema builder, and both
            // supported backends accept the same syntax.
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_turnos_unico_abierto \
                     ON turnos (estado) WHERE estado = 'abierto'",
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Turnos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Turnos {
        Table,
        Id,
        Fecha,
        Tipo,
        EncargadoId,
        EncargadoNombre,
        Estado,
        FechaApertura,
        FechaCierre,
    }
}

mod m20240101_000004_create_surtidores_table {

    use super::m20240101_000003_create_turnos_table::Turnos;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_surtidores_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Surtidores::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Surtidores::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Surtidores::TurnoId).integer().not_null())
                        .col(
                            ColumnDef::new(Surtidores::NumeroSurtidor)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Surtidores::LecturaInicial)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Surtidores::LecturaFinal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Surtidores::PrecioMetro).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_surtidores_turno_id")
                                .from(Surtidores::Table, Surtidores::TurnoId)
                                .to(Turnos::Table, Turnos::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_surtidores_turno_id")
                        .table(Surtidores::Table)
                        .col(Surtidores::TurnoId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Surtidores::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Surtidores {
        Table,
        Id,
        TurnoId,
        NumeroSurtidor,
        LecturaInicial,
        LecturaFinal,
        PrecioMetro,
    }
}

mod m20240101_000005_create_ventas_productos_table {

    use super::m20240101_000002_create_productos_table::Productos;
    use super::m20240101_000003_create_turnos_table::Turnos;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_ventas_productos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VentasProductos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VentasProductos::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(VentasProductos::TurnoId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VentasProductos::ProductoId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VentasProductos::ProductoNombre)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VentasProductos::Cantidad)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VentasProductos::PrecioUnitario)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VentasProductos::Total).decimal().not_null())
                        .col(
                            ColumnDef::new(VentasProductos::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ventas_productos_turno_id")
                                .from(VentasProductos::Table, VentasProductos::TurnoId)
                                .to(Turnos::Table, Turnos::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ventas_productos_producto_id")
                                .from(VentasProductos::Table, VentasProductos::ProductoId)
                                .to(Productos::Table, Productos::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ventas_productos_turno_id")
                        .table(VentasProductos::Table)
                        .col(VentasProductos::TurnoId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VentasProductos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VentasProductos {
        Table,
        Id,
        TurnoId,
        ProductoId,
        ProductoNombre,
        Cantidad,
        PrecioUnitario,
        Total,
        CreatedAt,
    }
}
