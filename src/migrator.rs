use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_catalog_tables::Migration),
            Box::new(m20250110_000002_create_production_tables::Migration),
            Box::new(m20250110_000003_create_inventory_tables::Migration),
            Box::new(m20250110_000004_create_yield_tables::Migration),
            Box::new(m20250110_000005_create_admin_tables::Migration),
            Box::new(m20250110_000006_create_crm_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20250110_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RawMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RawMaterials::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RawMaterials::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(RawMaterials::Status).string().not_null())
                        .col(ColumnDef::new(RawMaterials::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(RawMaterials::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RawMaterials::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Operators::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Operators::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Operators::Name).string().not_null())
                        .col(ColumnDef::new(Operators::Status).string().not_null())
                        .col(
                            ColumnDef::new(Operators::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Operators::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Silos::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Silos::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Silos::Name).string().not_null())
                        .col(ColumnDef::new(Silos::Status).string().not_null())
                        .col(
                            ColumnDef::new(Silos::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Silos::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Machines::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Machines::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Machines::Name).string().not_null())
                        .col(ColumnDef::new(Machines::Status).string().not_null())
                        .col(
                            ColumnDef::new(Machines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Machines::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Machines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Silos::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Operators::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RawMaterials::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum RawMaterials {
        Table,
        Id,
        Name,
        Status,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum Operators {
        Table,
        Id,
        Name,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum Silos {
        Table,
        Id,
        Name,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum Machines {
        Table,
        Id,
        Name,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000002_create_production_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000002_create_production_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionPointings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionPointings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::SheetNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::EndedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::RawMaterialId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::QuantityKg)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::Status)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionPointings::Notes).text())
                        .col(ColumnDef::new(ProductionPointings::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(ProductionPointings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPointings::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_pointings_raw_material")
                        .table(ProductionPointings::Table)
                        .col(ProductionPointings::RawMaterialId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PointingOperators::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PointingOperators::ProductionPointingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PointingOperators::OperatorId)
                                .uuid()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(PointingOperators::ProductionPointingId)
                                .col(PointingOperators::OperatorId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PointingSilos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PointingSilos::ProductionPointingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PointingSilos::SiloId).uuid().not_null())
                        .primary_key(
                            Index::create()
                                .col(PointingSilos::ProductionPointingId)
                                .col(PointingSilos::SiloId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MachineDowntimes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MachineDowntimes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MachineDowntimes::MachineId).uuid().not_null())
                        .col(
                            ColumnDef::new(MachineDowntimes::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MachineDowntimes::EndedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(MachineDowntimes::Reason).string().not_null())
                        .col(ColumnDef::new(MachineDowntimes::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(MachineDowntimes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MachineDowntimes::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MachineDowntimes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PointingSilos::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PointingOperators::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductionPointings::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum ProductionPointings {
        Table,
        Id,
        SheetNumber,
        StartedAt,
        EndedAt,
        RawMaterialId,
        QuantityKg,
        Status,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum PointingOperators {
        Table,
        ProductionPointingId,
        OperatorId,
    }

    #[derive(Iden)]
    pub enum PointingSilos {
        Table,
        ProductionPointingId,
        SiloId,
    }

    #[derive(Iden)]
    pub enum MachineDowntimes {
        Table,
        Id,
        MachineId,
        StartedAt,
        EndedAt,
        Reason,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000003_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000003_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryReservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryReservations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::ProductionPointingId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::RawMaterialId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::ReservedKg)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::ConsumedKg)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReservations::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::OccurredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::ItemType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryMovements::ItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(InventoryMovements::LocationType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryMovements::LocationId).uuid())
                        .col(
                            ColumnDef::new(InventoryMovements::Direction)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::Quantity)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryMovements::Unit).string().not_null())
                        .col(ColumnDef::new(InventoryMovements::ReferenceType).string())
                        .col(ColumnDef::new(InventoryMovements::ReferenceId).uuid())
                        .col(ColumnDef::new(InventoryMovements::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(InventoryMovements::CreatedAt)
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
                        .name("idx_inventory_movements_item")
                        .table(InventoryMovements::Table)
                        .col(InventoryMovements::ItemType)
                        .col(InventoryMovements::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_movements_occurred_at")
                        .table(InventoryMovements::Table)
                        .col(InventoryMovements::OccurredAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryReservations::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum InventoryReservations {
        Table,
        Id,
        ProductionPointingId,
        RawMaterialId,
        ReservedKg,
        ConsumedKg,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum InventoryMovements {
        Table,
        Id,
        OccurredAt,
        ItemType,
        ItemId,
        LocationType,
        LocationId,
        Direction,
        Quantity,
        Unit,
        ReferenceType,
        ReferenceId,
        CreatedBy,
        CreatedAt,
    }
}

mod m20250110_000004_create_yield_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000004_create_yield_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BlockTypes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(BlockTypes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(BlockTypes::Name).string().not_null())
                        .col(
                            ColumnDef::new(BlockTypes::DensityKgM3)
                                .decimal_len(10, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlockTypes::Status).string().not_null())
                        .col(
                            ColumnDef::new(BlockTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlockTypes::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BlockProductions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BlockProductions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlockProductions::ProductionPointingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlockProductions::BlockTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlockProductions::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlockProductions::EndedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlockProductions::WeightKg)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlockProductions::LengthMm).integer().not_null())
                        .col(ColumnDef::new(BlockProductions::WidthMm).integer().not_null())
                        .col(ColumnDef::new(BlockProductions::HeightMm).integer().not_null())
                        .col(
                            ColumnDef::new(BlockProductions::IsScrap)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(BlockProductions::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(BlockProductions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BlockProductions::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_block_productions_pointing")
                        .table(BlockProductions::Table)
                        .col(BlockProductions::ProductionPointingId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MoldTypes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(MoldTypes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(MoldTypes::Name).string().not_null())
                        .col(ColumnDef::new(MoldTypes::CavityCount).integer().not_null())
                        .col(ColumnDef::new(MoldTypes::Status).string().not_null())
                        .col(
                            ColumnDef::new(MoldTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MoldTypes::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MoldedProductions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MoldedProductions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::ProductionPointingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::MoldTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::PackageWeight)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::PackageQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::LossFactorEnabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::LossFactor)
                                .decimal_len(6, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::WeightConsideredUnit)
                                .decimal_len(12, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::TotalWeightConsidered)
                                .decimal_len(14, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(MoldedProductions::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(MoldedProductions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductions::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MoldedProductionScraps::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MoldedProductionScraps::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductionScraps::MoldedProductionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductionScraps::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductionScraps::Reason)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MoldedProductionScraps::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MoldedProductionScraps::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MoldedProductions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MoldTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BlockProductions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BlockTypes::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum BlockTypes {
        Table,
        Id,
        Name,
        DensityKgM3,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum BlockProductions {
        Table,
        Id,
        ProductionPointingId,
        BlockTypeId,
        StartedAt,
        EndedAt,
        WeightKg,
        LengthMm,
        WidthMm,
        HeightMm,
        IsScrap,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum MoldTypes {
        Table,
        Id,
        Name,
        CavityCount,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum MoldedProductions {
        Table,
        Id,
        ProductionPointingId,
        MoldTypeId,
        Quantity,
        PackageWeight,
        PackageQuantity,
        LossFactorEnabled,
        LossFactor,
        WeightConsideredUnit,
        TotalWeightConsidered,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum MoldedProductionScraps {
        Table,
        Id,
        MoldedProductionId,
        Quantity,
        Reason,
        CreatedAt,
    }
}

mod m20250110_000005_create_admin_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000005_create_admin_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string())
                        .col(ColumnDef::new(Clients::Phone).string())
                        .col(ColumnDef::new(Clients::Status).string().not_null())
                        .col(ColumnDef::new(Clients::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Sku).string().not_null().unique_key())
                        .col(ColumnDef::new(Products::Status).string().not_null())
                        .col(
                            ColumnDef::new(Products::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductComponents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductComponents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductComponents::ParentProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductComponents::ComponentProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductComponents::Quantity)
                                .decimal_len(12, 3)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Notes).text())
                        .col(ColumnDef::new(Orders::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrderItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(OrderItems::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderItems::LineTotal)
                                .decimal_len(14, 2)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductComponents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Users {
        Table,
        Id,
        Name,
        Email,
        Role,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum Clients {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Status,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum Products {
        Table,
        Id,
        Name,
        Sku,
        Status,
        UnitPrice,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum ProductComponents {
        Table,
        Id,
        ParentProductId,
        ComponentProductId,
        Quantity,
    }

    #[derive(Iden)]
    pub enum Orders {
        Table,
        Id,
        OrderNumber,
        ClientId,
        Status,
        TotalAmount,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum OrderItems {
        Table,
        Id,
        OrderId,
        ProductId,
        Quantity,
        UnitPrice,
        LineTotal,
    }
}

mod m20250110_000006_create_crm_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000006_create_crm_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Leads::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Leads::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Leads::Name).string().not_null())
                        .col(ColumnDef::new(Leads::Company).string())
                        .col(ColumnDef::new(Leads::Email).string())
                        .col(ColumnDef::new(Leads::Status).string().not_null())
                        .col(ColumnDef::new(Leads::EstimatedValue).decimal_len(14, 2))
                        .col(ColumnDef::new(Leads::Notes).text())
                        .col(ColumnDef::new(Leads::CreatedBy).uuid())
                        .col(
                            ColumnDef::new(Leads::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Leads::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Leads::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Leads {
        Table,
        Id,
        Name,
        Company,
        Email,
        Status,
        EstimatedValue,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}
