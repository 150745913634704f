//! Schema & constraint layer: table/column metadata and DDL rendering.
//!
//! Pure structure definition, no runtime business logic. The migration
//! plan is dependency-ordered (independent entities first, join tables
//! last) and the drop plan is its exact reverse, so both directions are
//! safe to run front-to-back.

pub mod tables;

use crate::graph::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Integer,
    Double,
    Text,
    Boolean,
    TimestampTz,
    Date,
    Uuid,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::BigInt => "BIGINT",
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE PRECISION",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::TimestampTz => "TIMESTAMPTZ",
            Self::Date => "DATE",
            Self::Uuid => "UUID",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    /// Referenced parent table, rendered as a FOREIGN KEY constraint.
    pub references: Option<&'static str>,
    pub unique: bool,
}

#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: &'static str,
    /// None for pure join tables.
    pub entity: Option<EntityKind>,
    pub columns: Vec<ColumnDef>,
    /// Composite unique constraints (join pairs, one-registration-per-pair).
    pub uniques: Vec<Vec<&'static str>>,
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render `CREATE TABLE` DDL. Every table gets an auto-incrementing
    /// `id` primary key plus `created_at` / `updated_at`.
    pub fn create_sql(&self) -> String {
        let mut lines = vec!["    id BIGSERIAL PRIMARY KEY".to_string()];
        for col in &self.columns {
            let mut line = format!("    {} {}", col.name, col.ty.sql());
            if !col.nullable {
                line.push_str(" NOT NULL");
            }
            if col.unique {
                line.push_str(" UNIQUE");
            }
            lines.push(line);
        }
        lines.push("    created_at TIMESTAMPTZ NOT NULL DEFAULT now()".to_string());
        lines.push("    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()".to_string());
        for cols in &self.uniques {
            lines.push(format!(
                "    CONSTRAINT uq_{}_{} UNIQUE ({})",
                self.name,
                cols.join("_"),
                cols.join(", ")
            ));
        }
        for col in &self.columns {
            if let Some(parent) = col.references {
                lines.push(format!(
                    "    CONSTRAINT fk_{}_{} FOREIGN KEY ({}) REFERENCES {}(id)",
                    self.name, col.name, col.name, parent
                ));
            }
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            self.name,
            lines.join(",\n")
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

/// All tables in creation order: parents strictly before children
/// (self-references excepted), join tables last.
pub fn migration_plan() -> Vec<TableDef> {
    tables::all()
}

/// Drop order: reverse of the migration plan.
pub fn drop_plan() -> Vec<TableDef> {
    let mut plan = tables::all();
    plan.reverse();
    plan
}

/// Metadata lookup for an entity's table.
pub fn table_for(kind: EntityKind) -> TableDef {
    tables::all()
        .into_iter()
        .find(|t| t.entity == Some(kind))
        .expect("every EntityKind has a table definition")
}

// ── builder helpers ──────────────────────────────────────────

pub(crate) fn col(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef { name, ty, nullable: false, references: None, unique: false }
}

pub(crate) fn nullable(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef { name, ty, nullable: true, references: None, unique: false }
}

pub(crate) fn unique(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef { name, ty, nullable: false, references: None, unique: true }
}

pub(crate) fn fk(name: &'static str, parent: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::BigInt,
        nullable: false,
        references: Some(parent),
        unique: false,
    }
}

pub(crate) fn fk_unique(name: &'static str, parent: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::BigInt,
        nullable: false,
        references: Some(parent),
        unique: true,
    }
}

pub(crate) fn fk_nullable(name: &'static str, parent: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::BigInt,
        nullable: true,
        references: Some(parent),
        unique: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn plan_creates_parents_before_children() {
        let mut seen: HashSet<&str> = HashSet::new();
        for table in migration_plan() {
            for column in &table.columns {
                if let Some(parent) = column.references {
                    assert!(
                        parent == table.name || seen.contains(parent),
                        "{}.{} references {} before it exists",
                        table.name,
                        column.name,
                        parent
                    );
                }
            }
            seen.insert(table.name);
        }
    }

    #[test]
    fn drop_plan_is_reverse_of_migration_plan() {
        let create: Vec<&str> = migration_plan().iter().map(|t| t.name).collect();
        let mut drop: Vec<&str> = drop_plan().iter().map(|t| t.name).collect();
        drop.reverse();
        assert_eq!(create, drop);
    }

    #[test]
    fn every_entity_kind_has_exactly_one_table() {
        let plan = migration_plan();
        for kind in EntityKind::ALL {
            let count = plan.iter().filter(|t| t.entity == Some(kind)).count();
            assert_eq!(count, 1, "{kind:?} must map to exactly one table");
            assert_eq!(table_for(kind).name, kind.as_str());
        }
    }

    #[test]
    fn users_ddl_declares_unique_email() {
        let ddl = table_for(EntityKind::User).create_sql();
        assert!(ddl.contains("email TEXT NOT NULL UNIQUE"));
        assert!(ddl.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS users"));
    }

    #[test]
    fn join_tables_declare_pair_uniqueness() {
        for table in migration_plan().into_iter().filter(|t| t.entity.is_none()) {
            assert!(
                !table.uniques.is_empty(),
                "join table {} must declare a unique pair",
                table.name
            );
        }
    }

    #[test]
    fn profile_ddl_enforces_one_per_user() {
        let ddl = table_for(EntityKind::Profile).create_sql();
        assert!(ddl.contains("user_id BIGINT NOT NULL UNIQUE"));
        assert!(ddl.contains("FOREIGN KEY (user_id) REFERENCES users(id)"));
    }
}
