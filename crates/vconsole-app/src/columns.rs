// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{ActivityPreview, AdminAccount, SignUpRecord, Volunteer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Status,
    Flag,
    Timestamp,
}

impl ColumnKind {
    pub const fn is_right_aligned(self) -> bool {
        matches!(self, Self::Number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(i64),
    Status {
        label: &'static str,
        tone: StatusTone,
    },
    Flag(bool),
    Timestamp(Option<String>),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
            Self::Status { label, .. } => (*label).to_owned(),
            Self::Flag(true) => "yes".to_owned(),
            Self::Flag(false) => "no".to_owned(),
            // backend timestamps are `YYYY-MM-DD HH:MM:SS`; minutes are enough here
            Self::Timestamp(Some(value)) => value.get(..16).unwrap_or(value).to_owned(),
            Self::Timestamp(None) => String::new(),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Status { tone, .. } => *tone,
            _ => StatusTone::Neutral,
        }
    }
}

/// One table column: heading, layout hints and the cell extractor.
pub struct ColumnSpec<D> {
    pub title: &'static str,
    pub kind: ColumnKind,
    pub width: u16,
    pub value: fn(&D) -> CellValue,
}

impl<D> std::fmt::Debug for ColumnSpec<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("width", &self.width)
            .finish()
    }
}

/// A record that knows how to lay itself out as a table row.
pub trait TableRecord: Sized + 'static {
    fn columns() -> &'static [ColumnSpec<Self>];

    fn row_id(&self) -> i64;

    fn cells(&self) -> Vec<CellValue> {
        Self::columns()
            .iter()
            .map(|column| (column.value)(self))
            .collect()
    }
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_owned())
}

fn timestamp(value: &str) -> CellValue {
    if value.trim().is_empty() {
        CellValue::Timestamp(None)
    } else {
        CellValue::Timestamp(Some(value.to_owned()))
    }
}

const ADMIN_COLUMNS: &[ColumnSpec<AdminAccount>] = &[
    ColumnSpec {
        title: "ID",
        kind: ColumnKind::Number,
        width: 6,
        value: |row| CellValue::Number(row.id.get()),
    },
    ColumnSpec {
        title: "Name",
        kind: ColumnKind::Text,
        width: 16,
        value: |row| text(&row.name),
    },
    ColumnSpec {
        title: "Gender",
        kind: ColumnKind::Text,
        width: 8,
        value: |row| text(row.sex.label()),
    },
    ColumnSpec {
        title: "Phone",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.pure_phone_number),
    },
    ColumnSpec {
        title: "State",
        kind: ColumnKind::Status,
        width: 10,
        value: |row| CellValue::Status {
            label: row.state.label(),
            tone: row.state.tone(),
        },
    },
];

const ACTIVITY_COLUMNS: &[ColumnSpec<ActivityPreview>] = &[
    ColumnSpec {
        title: "ID",
        kind: ColumnKind::Number,
        width: 6,
        value: |row| CellValue::Number(row.id.get()),
    },
    ColumnSpec {
        title: "Name",
        kind: ColumnKind::Text,
        width: 24,
        value: |row| text(&row.name),
    },
    ColumnSpec {
        title: "City",
        kind: ColumnKind::Text,
        width: 10,
        value: |row| text(&row.city),
    },
    ColumnSpec {
        title: "Venue",
        kind: ColumnKind::Text,
        width: 20,
        value: |row| text(&row.address),
    },
    ColumnSpec {
        title: "State",
        kind: ColumnKind::Status,
        width: 14,
        value: |row| CellValue::Status {
            label: row.state.label(),
            tone: row.state.tone(),
        },
    },
    ColumnSpec {
        title: "Starts",
        kind: ColumnKind::Timestamp,
        width: 16,
        value: |row| timestamp(&row.start_at),
    },
    ColumnSpec {
        title: "Ends",
        kind: ColumnKind::Timestamp,
        width: 16,
        value: |row| timestamp(&row.end_at),
    },
];

const VOLUNTEER_COLUMNS: &[ColumnSpec<Volunteer>] = &[
    ColumnSpec {
        title: "ID",
        kind: ColumnKind::Number,
        width: 6,
        value: |row| CellValue::Number(row.id.get()),
    },
    ColumnSpec {
        title: "Name",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.name),
    },
    ColumnSpec {
        title: "Gender",
        kind: ColumnKind::Text,
        width: 8,
        value: |row| text(row.sex.label()),
    },
    ColumnSpec {
        title: "Age",
        kind: ColumnKind::Number,
        width: 4,
        value: |row| CellValue::Number(row.age),
    },
    ColumnSpec {
        title: "Phone",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.pure_phone_number),
    },
    ColumnSpec {
        title: "Identity",
        kind: ColumnKind::Text,
        width: 8,
        value: |row| text(row.identity.label()),
    },
    ColumnSpec {
        title: "List",
        kind: ColumnKind::Status,
        width: 10,
        value: |row| CellValue::Status {
            label: row.state.label(),
            tone: row.state.tone(),
        },
    },
    ColumnSpec {
        title: "Verified",
        kind: ColumnKind::Flag,
        width: 8,
        value: |row| CellValue::Flag(row.is_student_verified),
    },
    ColumnSpec {
        title: "Joined",
        kind: ColumnKind::Timestamp,
        width: 16,
        value: |row| timestamp(&row.create_at),
    },
];

const SIGN_UP_COLUMNS: &[ColumnSpec<SignUpRecord>] = &[
    ColumnSpec {
        title: "ID",
        kind: ColumnKind::Number,
        width: 6,
        value: |row| CellValue::Number(row.id.get()),
    },
    ColumnSpec {
        title: "Name",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.name),
    },
    ColumnSpec {
        title: "Phone",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.pure_phone_number),
    },
    ColumnSpec {
        title: "Work",
        kind: ColumnKind::Text,
        width: 14,
        value: |row| text(&row.activity_work.label),
    },
    ColumnSpec {
        title: "Sign-up",
        kind: ColumnKind::Status,
        width: 16,
        value: |row| CellValue::Status {
            label: row.activity_work_volunteer_state.label(),
            tone: row.activity_work_volunteer_state.tone(),
        },
    },
    ColumnSpec {
        title: "Role",
        kind: ColumnKind::Status,
        width: 10,
        value: |row| CellValue::Status {
            label: row.activity_work_volunteer_identity.label(),
            tone: row.activity_work_volunteer_identity.tone(),
        },
    },
    ColumnSpec {
        title: "List",
        kind: ColumnKind::Status,
        width: 10,
        value: |row| CellValue::Status {
            label: row.volunteer_state.label(),
            tone: row.volunteer_state.tone(),
        },
    },
    ColumnSpec {
        title: "Whitelisted",
        kind: ColumnKind::Flag,
        width: 11,
        value: |row| CellValue::Flag(row.use_white),
    },
    ColumnSpec {
        title: "Joined",
        kind: ColumnKind::Timestamp,
        width: 16,
        value: |row| timestamp(&row.join_at),
    },
];

impl TableRecord for AdminAccount {
    fn columns() -> &'static [ColumnSpec<Self>] {
        ADMIN_COLUMNS
    }

    fn row_id(&self) -> i64 {
        self.id.get()
    }
}

impl TableRecord for ActivityPreview {
    fn columns() -> &'static [ColumnSpec<Self>] {
        ACTIVITY_COLUMNS
    }

    fn row_id(&self) -> i64 {
        self.id.get()
    }
}

impl TableRecord for Volunteer {
    fn columns() -> &'static [ColumnSpec<Self>] {
        VOLUNTEER_COLUMNS
    }

    fn row_id(&self) -> i64 {
        self.id.get()
    }
}

impl TableRecord for SignUpRecord {
    fn columns() -> &'static [ColumnSpec<Self>] {
        SIGN_UP_COLUMNS
    }

    fn row_id(&self) -> i64 {
        self.id.get()
    }
}
