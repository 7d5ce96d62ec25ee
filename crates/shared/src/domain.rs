use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrorKind};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);

/// Top-level screens of the client. `Dashboard` is the user list,
/// `Profile` the tabbed profile editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Profile,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Profile => "profile",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dashboard" => Some(Screen::Dashboard),
            "profile" => Some(Screen::Profile),
            _ => None,
        }
    }
}

/// Independently editable sections of the profile editor. Only one may be
/// in edit mode at a time across the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    BasicInfo,
    EducationSkills,
    Experience,
}

impl SectionId {
    pub const ALL: [SectionId; 3] = [
        SectionId::BasicInfo,
        SectionId::EducationSkills,
        SectionId::Experience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::BasicInfo => "basicInfo",
            SectionId::EducationSkills => "educationSkills",
            SectionId::Experience => "experience",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == raw)
    }
}

/// Editable fields of the profile form, keyed externally by the camelCase
/// identifiers the form surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    PhoneCountryCode,
    Phone,
    AltPhone,
    DateOfBirth,
    Gender,
    Address,
    Pincode,
    DomicileState,
    DomicileCountry,
    Resume,
}

impl ProfileField {
    const MAPPING: [(ProfileField, &'static str); 13] = [
        (ProfileField::FirstName, "firstName"),
        (ProfileField::LastName, "lastName"),
        (ProfileField::Email, "email"),
        (ProfileField::PhoneCountryCode, "phoneCountryCode"),
        (ProfileField::Phone, "phone"),
        (ProfileField::AltPhone, "altPhone"),
        (ProfileField::DateOfBirth, "dateOfBirth"),
        (ProfileField::Gender, "gender"),
        (ProfileField::Address, "address"),
        (ProfileField::Pincode, "pincode"),
        (ProfileField::DomicileState, "domicileState"),
        (ProfileField::DomicileCountry, "domicileCountry"),
        (ProfileField::Resume, "resume"),
    ];

    pub fn external_id(self) -> &'static str {
        Self::MAPPING
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, id)| *id)
            .unwrap_or("unknown")
    }

    /// Resolves an external field identifier. Unknown identifiers are
    /// rejected rather than silently ignored.
    pub fn parse(external: &str) -> Result<Self, ValidationError> {
        Self::MAPPING
            .iter()
            .find(|(_, id)| *id == external)
            .map(|(field, _)| *field)
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::UnknownField, external))
    }

    /// The section that owns this field. Every editable field currently
    /// belongs to the basic-info section.
    pub fn section(self) -> SectionId {
        SectionId::BasicInfo
    }
}

/// The profile entity. All fields default to the empty string, and absence
/// and empty string are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_country_code: String,
    pub phone: String,
    pub alt_phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub pincode: String,
    pub domicile_state: String,
    pub domicile_country: String,
    pub resume_file_name: String,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_country_code: "+91".to_string(),
            phone: String::new(),
            alt_phone: String::new(),
            date_of_birth: String::new(),
            gender: String::new(),
            address: String::new(),
            pincode: String::new(),
            domicile_state: String::new(),
            domicile_country: String::new(),
            resume_file_name: String::new(),
        }
    }
}

impl ProfileRecord {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Email => &self.email,
            ProfileField::PhoneCountryCode => &self.phone_country_code,
            ProfileField::Phone => &self.phone,
            ProfileField::AltPhone => &self.alt_phone,
            ProfileField::DateOfBirth => &self.date_of_birth,
            ProfileField::Gender => &self.gender,
            ProfileField::Address => &self.address,
            ProfileField::Pincode => &self.pincode,
            ProfileField::DomicileState => &self.domicile_state,
            ProfileField::DomicileCountry => &self.domicile_country,
            ProfileField::Resume => &self.resume_file_name,
        }
    }

    /// Raw field assignment. This is the "path other than the form surface":
    /// it does not enforce edit mode or email immutability. The editing
    /// controller layers those rules on top.
    pub fn set_raw(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::FirstName => self.first_name = value,
            ProfileField::LastName => self.last_name = value,
            ProfileField::Email => self.email = value,
            ProfileField::PhoneCountryCode => self.phone_country_code = value,
            ProfileField::Phone => self.phone = value,
            ProfileField::AltPhone => self.alt_phone = value,
            ProfileField::DateOfBirth => self.date_of_birth = value,
            ProfileField::Gender => self.gender = value,
            ProfileField::Address => self.address = value,
            ProfileField::Pincode => self.pincode = value,
            ProfileField::DomicileState => self.domicile_state = value,
            ProfileField::DomicileCountry => self.domicile_country = value,
            ProfileField::Resume => self.resume_file_name = value,
        }
    }
}

/// Input for creating a dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

/// A dashboard user as persisted, with its storage-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}
