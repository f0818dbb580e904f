//! Method-call dispatch for embedding hosts.
//!
//! Hosts send a method name, the encoded image and a map of named integer
//! arguments. [`MethodCall::parse`] turns that into an [`ImageOp`],
//! [`respond`] runs it and produces a [`Reply`], and [`CallHandler`] does
//! the same on a bounded worker pool.
//!
//! # Argument keys
//!
//! | Method        | Keys                                     |
//! |---------------|------------------------------------------|
//! | `crop`        | `x`, `y`, `width`, `height`, `quality`   |
//! | `rotate`      | `angle`, `quality`                       |
//! | `resize`      | `destWidth`, `destHeight`, `quality`     |
//! | `resizeToMax` | `maxSize`, `quality`                     |

use log::warn;
use serde::{Deserialize, Deserializer};

use crate::codec::Codec;
use crate::error::CallError;
use crate::ops::{execute, ImageOp};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CropArgs {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    quality: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RotateArgs {
    angle: i32,
    quality: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizeArgs {
    dest_width: i32,
    dest_height: i32,
    quality: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizeToMaxArgs {
    max_size: i32,
    quality: i32,
}

/// A parsed host request: the image and what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub bytes: Vec<u8>,
    pub op: ImageOp,
}

impl MethodCall {
    pub fn new(bytes: Vec<u8>, op: ImageOp) -> Self {
        Self { bytes, op }
    }

    /// Parse a host call from its method name and argument map.
    ///
    /// # Errors
    ///
    /// Returns `CallError::NotImplemented` for an unknown method and
    /// `CallError::InvalidArguments` if a key is missing or not an integer.
    pub fn parse<'de, D>(method: &str, bytes: Vec<u8>, args: D) -> Result<Self, CallError>
    where
        D: Deserializer<'de>,
    {
        let invalid = |e: D::Error| CallError::InvalidArguments {
            method: method.to_string(),
            reason: e.to_string(),
        };

        let op = match method {
            "crop" => {
                let a = CropArgs::deserialize(args).map_err(invalid)?;
                ImageOp::crop(a.x, a.y, a.width, a.height, a.quality)
            }
            "rotate" => {
                let a = RotateArgs::deserialize(args).map_err(invalid)?;
                ImageOp::rotate(a.angle, a.quality)
            }
            "resize" => {
                let a = ResizeArgs::deserialize(args).map_err(invalid)?;
                ImageOp::resize(a.dest_width, a.dest_height, a.quality)
            }
            "resizeToMax" => {
                let a = ResizeToMaxArgs::deserialize(args).map_err(invalid)?;
                ImageOp::resize_to_max(a.max_size, a.quality)
            }
            other => return Err(CallError::NotImplemented(other.to_string())),
        };

        Ok(Self { bytes, op })
    }
}

/// What a host receives for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The re-encoded JPEG.
    Success(Vec<u8>),
    /// The operation failed; the host sees an absent result.
    NoResult,
    /// The method name is not supported.
    NotImplemented,
    /// The request itself was malformed.
    InvalidArguments(String),
}

impl Reply {
    /// The JPEG bytes, if the call succeeded.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Reply::Success(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<CallError> for Reply {
    fn from(err: CallError) -> Self {
        match err {
            CallError::NotImplemented(_) => Reply::NotImplemented,
            e @ CallError::InvalidArguments { .. } => Reply::InvalidArguments(e.to_string()),
        }
    }
}

/// Run a parsed call and convert the outcome into a reply.
pub fn respond<C: Codec + ?Sized>(codec: &C, call: &MethodCall) -> Reply {
    match execute(codec, &call.bytes, &call.op) {
        Ok(bytes) => Reply::Success(bytes),
        Err(e) => {
            warn!("{} failed: {}", call.op.name(), e);
            Reply::NoResult
        }
    }
}

/// Parse and run a call in one step.
pub fn dispatch<'de, C, D>(codec: &C, method: &str, bytes: Vec<u8>, args: D) -> Reply
where
    C: Codec + ?Sized,
    D: Deserializer<'de>,
{
    match MethodCall::parse(method, bytes, args) {
        Ok(call) => respond(codec, &call),
        Err(e) => {
            warn!("Rejected call: {}", e);
            e.into()
        }
    }
}

#[cfg(feature = "threads")]
pub use pool::CallHandler;

#[cfg(feature = "threads")]
mod pool {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use log::{debug, error};
    use rayon::{ThreadPool, ThreadPoolBuilder};

    use super::{respond, MethodCall, Reply};
    use crate::codec::ImageCodec;
    use crate::config::HandlerConfig;
    use crate::error::HandlerError;

    /// Runs calls on a fixed pool of worker threads.
    ///
    /// Calls are started in submission order. Each call's reply goes to the
    /// callback submitted with it, exactly once.
    pub struct CallHandler {
        pool: ThreadPool,
        codec: ImageCodec,
    }

    impl CallHandler {
        /// Start the worker pool.
        ///
        /// # Errors
        ///
        /// Returns `HandlerError::Pool` if the threads cannot be spawned.
        pub fn new(config: HandlerConfig) -> Result<Self, HandlerError> {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .thread_name(|i| format!("image-utils-{}", i))
                .build()?;

            debug!("Started {} image workers", pool.current_num_threads());

            Ok(Self {
                pool,
                codec: ImageCodec::new(config.codec),
            })
        }

        pub fn workers(&self) -> usize {
            self.pool.current_num_threads()
        }

        /// Queue `call` and deliver its reply to `reply` from a worker thread.
        pub fn handle<F>(&self, call: MethodCall, reply: F)
        where
            F: FnOnce(Reply) + Send + 'static,
        {
            let codec = self.codec;
            self.pool.spawn_fifo(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| respond(&codec, &call)));
                match outcome {
                    Ok(r) => reply(r),
                    Err(_) => {
                        error!("{} panicked", call.op.name());
                        reply(Reply::NoResult)
                    }
                }
            });
        }
    }
}
