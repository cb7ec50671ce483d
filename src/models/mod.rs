//! Domain models.

mod profile;

pub use profile::{
    DEFAULT_COUNTRY, NewProfile, Profile, ProfileKey, ProfilePatch, UserRole, VerificationStatus,
};
