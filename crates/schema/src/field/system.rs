//! Fields every entity carries
//!
//! The backend maintains these on each record. They are always read-only.

use super::{DateTimeField, FieldDescriptor, NumberField, StringField, UserField};

pub const ID: &str = "_id";
pub const CREATED_AT: &str = "_created_at";
pub const MODIFIED_AT: &str = "_modified_at";
pub const CREATED_BY: &str = "_created_by";
pub const MODIFIED_BY: &str = "_modified_by";
pub const VERSION: &str = "_version";
pub const M_VERSION: &str = "_m_version";

/// Ids of the system fields in declaration order
pub const SYSTEM_FIELD_IDS: [&str; 7] = [
    ID,
    CREATED_AT,
    MODIFIED_AT,
    CREATED_BY,
    MODIFIED_BY,
    VERSION,
    M_VERSION,
];

#[must_use]
pub fn is_system_field(id: &str) -> bool {
    SYSTEM_FIELD_IDS.contains(&id)
}

/// Fresh, unbound descriptors of all system fields
#[must_use]
pub fn system_fields() -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = vec![
        StringField::new(ID, "Id").primary_key().into(),
        DateTimeField::new(CREATED_AT, "Created at").into(),
        DateTimeField::new(MODIFIED_AT, "Modified at").into(),
        UserField::new(CREATED_BY, "Created by").into(),
        UserField::new(MODIFIED_BY, "Modified by").into(),
        NumberField::new(VERSION, "Version").into(),
        NumberField::new(M_VERSION, "Modification version").into(),
    ];
    for field in &mut fields {
        field.meta_mut().read_only = true;
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::field::FieldKind;

    #[test]
    fn system_fields_are_read_only_and_ordered() {
        let fields = system_fields();
        let ids: Vec<&str> = fields.iter().map(FieldDescriptor::id).collect();
        assert_eq!(ids, SYSTEM_FIELD_IDS);
        assert!(fields.iter().all(FieldDescriptor::is_read_only));
        assert!(fields[0].is_primary_key());
        assert_eq!(fields[3].kind(), FieldKind::User);
    }

    #[test]
    fn recognises_system_ids() {
        assert!(is_system_field("_version"));
        assert!(!is_system_field("Price"));
    }
}
