pub mod document;
pub mod document_list;
pub mod network;
pub mod not_found;
