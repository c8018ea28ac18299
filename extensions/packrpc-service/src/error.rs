use std::fmt;

/// Failures that occur after a request has been parsed.
///
/// The `Display` text of every variant is exactly what a client receives as
/// the response error description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcDispatchError {
    /// No handler is bound under the requested name.
    MethodNotFound { method: String },

    /// The request carries a different number of parameters than the handler declares.
    ParameterCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A lazy decoder could not be built around a received parameter.
    ParameterDecoder(String),

    /// A received parameter could not be decoded into the declared type.
    ParameterDecode(String),

    /// The handler returned an error through its trailing error slot.
    Handler(String),

    /// The handler's return value could not be turned into a MessagePack value.
    ResultEncode(String),
}

impl fmt::Display for RpcDispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcDispatchError::MethodNotFound { method } => {
                write!(f, "No handler exists for method {method}")
            }
            RpcDispatchError::ParameterCount {
                method,
                expected,
                actual,
            } => write!(
                f,
                "Parameter count for {method} doesn't match. Should be {expected}, but is {actual}"
            ),
            RpcDispatchError::ParameterDecoder(detail) => {
                write!(f, "Failed to create the decoder for a parameter ({detail})")
            }
            RpcDispatchError::ParameterDecode(detail) => {
                write!(f, "Failed to decode a parameter ({detail})")
            }
            RpcDispatchError::Handler(description) => f.write_str(description),
            RpcDispatchError::ResultEncode(detail) => {
                write!(f, "Failed to encode the result ({detail})")
            }
        }
    }
}

impl std::error::Error for RpcDispatchError {}
