use serde::{Deserialize, Serialize};

// ── Profile Fields ───────────────────────────────────────────────────────────
//
// The identity service stores free-form text under field ids.  These three
// ids are the service-side schema and must match it byte for byte.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileField {
    FirstName,
    DateOfBirth,
    FavoriteColor,
}

impl ProfileField {
    /// Request order for loads and saves.
    pub const ALL: [ProfileField; 3] = [
        ProfileField::FirstName,
        ProfileField::DateOfBirth,
        ProfileField::FavoriteColor,
    ];

    /// Field id as stored by the identity service.
    pub fn id(self) -> &'static str {
        match self {
            ProfileField::FirstName => "first-name",
            ProfileField::DateOfBirth => "date-of-birth",
            ProfileField::FavoriteColor => "favorite-color",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// The three locally editable fields.  Values are opaque text: an empty
/// string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub date_of_birth: String,
    pub favorite_color: String,
}

impl Profile {
    pub fn new(
        first_name: impl Into<String>,
        date_of_birth: impl Into<String>,
        favorite_color: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            date_of_birth: date_of_birth.into(),
            favorite_color: favorite_color.into(),
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::DateOfBirth => &self.date_of_birth,
            ProfileField::FavoriteColor => &self.favorite_color,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::FirstName => self.first_name = value,
            ProfileField::DateOfBirth => self.date_of_birth = value,
            ProfileField::FavoriteColor => self.favorite_color = value,
        }
    }

    /// Write entries in `ProfileField::ALL` order.
    pub fn entries(&self) -> Vec<FieldEntry> {
        ProfileField::ALL
            .into_iter()
            .map(|field| FieldEntry::new(field, self.get(field)))
            .collect()
    }
}

/// One `{field_id, value}` pair sent to the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field_id: String,
    pub value: String,
}

impl FieldEntry {
    pub fn new(field: ProfileField, value: impl Into<String>) -> Self {
        Self {
            field_id: field.id().to_string(),
            value: value.into(),
        }
    }
}

/// A field as returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    field_id: String,
    #[serde(default)]
    value: String,
}

impl FieldValue {
    pub fn new(field_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> Option<ProfileField> {
        ProfileField::from_id(&self.field_id)
    }

    pub fn text(&self) -> &str {
        &self.value
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
