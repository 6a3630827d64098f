pub mod application_dto;
pub mod auth_dto;
pub mod dashboard_dto;
pub mod internship_dto;
pub mod note_dto;
pub mod response;
