pub mod ads;
pub mod comments;
pub mod insights;
pub mod instagram;
pub mod leads;
pub mod messaging;
pub mod pages;
pub mod utility;
pub mod webhooks;
