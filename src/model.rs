//! Static entity model: table shapes, API path segments, and per-entity rules.

/// Column value kind. Drives SQL types, bind casts, and request validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    /// 64-bit reference to another table's id column.
    Reference(&'static str),
}

impl ColumnKind {
    /// PostgreSQL type name, used both in DDL and as a bind cast (`$n::type`).
    pub fn pg_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer | ColumnKind::Reference(_) => "bigint",
            ColumnKind::Decimal => "double precision",
        }
    }
}

/// Extra format constraint checked on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnFormat {
    Email,
}

pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
    pub unique: bool,
    pub format: Option<ColumnFormat>,
}

/// Status family used when a list page lands beyond the last row. The course
/// endpoints answer 422 while the other three answer 404; both are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListOverflow {
    Unprocessable,
    NotFound,
}

pub struct EntitySchema {
    pub table_name: &'static str,
    pub path_segment: &'static str,
    /// Data columns, excluding the generated id.
    pub columns: &'static [ColumnDef],
    pub list_overflow: ListOverflow,
}

impl EntitySchema {
    /// Primary key column, identical for every table.
    pub const PK: &'static str = "id";
}

pub static COURSES: EntitySchema = EntitySchema {
    table_name: "courses",
    path_segment: "courses",
    list_overflow: ListOverflow::Unprocessable,
    columns: &[
        ColumnDef {
            name: "name",
            kind: ColumnKind::Text,
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "semester",
            kind: ColumnKind::Integer,
            required: true,
            unique: false,
            format: None,
        },
    ],
};

pub static STUDENTS: EntitySchema = EntitySchema {
    table_name: "students",
    path_segment: "students",
    list_overflow: ListOverflow::NotFound,
    columns: &[
        ColumnDef {
            name: "name",
            kind: ColumnKind::Text,
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "email",
            kind: ColumnKind::Text,
            required: true,
            unique: true,
            format: Some(ColumnFormat::Email),
        },
        ColumnDef {
            name: "gpa",
            kind: ColumnKind::Decimal,
            required: true,
            unique: false,
            format: None,
        },
    ],
};

pub static PROFESSORS: EntitySchema = EntitySchema {
    table_name: "professors",
    path_segment: "professors",
    list_overflow: ListOverflow::NotFound,
    columns: &[
        ColumnDef {
            name: "name",
            kind: ColumnKind::Text,
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "email",
            kind: ColumnKind::Text,
            required: true,
            unique: true,
            format: Some(ColumnFormat::Email),
        },
    ],
};

pub static ENROLLMENTS: EntitySchema = EntitySchema {
    table_name: "enrollments",
    path_segment: "enrollments",
    list_overflow: ListOverflow::NotFound,
    columns: &[
        ColumnDef {
            name: "course_id",
            kind: ColumnKind::Reference("courses"),
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "student_id",
            kind: ColumnKind::Reference("students"),
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "professor_id",
            kind: ColumnKind::Reference("professors"),
            required: true,
            unique: false,
            format: None,
        },
        ColumnDef {
            name: "grade",
            kind: ColumnKind::Decimal,
            required: false,
            unique: false,
            format: None,
        },
    ],
};

/// All entities in dependency order: referenced tables before enrollments.
pub static ENTITIES: [&EntitySchema; 4] = [&COURSES, &STUDENTS, &PROFESSORS, &ENROLLMENTS];

pub fn entity_by_path(path: &str) -> Option<&'static EntitySchema> {
    ENTITIES.iter().copied().find(|e| e.path_segment == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_path_segment() {
        assert_eq!(entity_by_path("courses").unwrap().table_name, "courses");
        assert_eq!(entity_by_path("enrollments").unwrap().columns.len(), 4);
        assert!(entity_by_path("buildings").is_none());
        assert!(entity_by_path("course").is_none());
    }

    #[test]
    fn overflow_status_per_family() {
        assert_eq!(COURSES.list_overflow, ListOverflow::Unprocessable);
        assert_eq!(STUDENTS.list_overflow, ListOverflow::NotFound);
        assert_eq!(PROFESSORS.list_overflow, ListOverflow::NotFound);
        assert_eq!(ENROLLMENTS.list_overflow, ListOverflow::NotFound);
    }

    #[test]
    fn grade_is_the_only_optional_column() {
        for e in ENTITIES {
            for c in e.columns {
                if e.table_name == "enrollments" && c.name == "grade" {
                    assert!(!c.required);
                } else {
                    assert!(c.required, "{}.{} should be required", e.table_name, c.name);
                }
            }
        }
    }

    #[test]
    fn reference_columns_use_bigint() {
        for c in ENROLLMENTS.columns {
            if let ColumnKind::Reference(table) = c.kind {
                assert_eq!(c.kind.pg_type(), "bigint");
                assert!(entity_by_path(table).is_some());
            }
        }
    }
}
