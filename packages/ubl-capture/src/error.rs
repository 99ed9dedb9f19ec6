pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid capture config: {message}")]
	InvalidConfig { message: String },
	#[error("Failed to encode search source: {0}")]
	EncodeQuery(#[from] serde_json::Error),
}
