pub mod connections;
pub mod enrichment;
pub mod llm;
pub mod recommendations;
pub mod users;
pub mod videos;
