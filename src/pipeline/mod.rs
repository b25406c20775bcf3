//! Transfer stages used by [`crate::ConversionClient`].
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`upload`] | Build the `POST /convert` request (multipart or JSON) |
//! | 2 | [`download`] | Fetch the finished PDF to disk or memory |
//!
//! Status polling sits in the client itself since it only needs one GET.

pub mod download;
pub mod upload;
