pub mod backend_client;
pub mod records_response;

pub use backend_client::BackendClient;
pub use records_response::{FetchParams, RecordsResponse};
