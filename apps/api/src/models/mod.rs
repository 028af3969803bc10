pub mod jobs;
pub mod profile;
pub mod resume;
pub mod skills;
