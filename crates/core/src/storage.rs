//! Object-storage key schemes and public URL construction.
//!
//! Keys are built here, in one place, so the upload handler, the analytics
//! exporter, and tests agree on layout:
//!
//! ```text
//! {user_id}/{project_id}/image_{n}{ext}     uploaded scene images
//! analytics/{yyyy-Mon}/{yyyy-m-d}.csv       analytics exports
//! ```

use chrono::Datelike;

use crate::types::{DbId, Timestamp};

/// Build the object key for the `n`-th uploaded image of a project (1-based).
///
/// `ext` is the original filename's extension including the leading dot, or
/// empty when the filename has none.
pub fn image_key(user_id: DbId, project_id: DbId, n: usize, ext: &str) -> String {
    format!("{user_id}/{project_id}/image_{n}{ext}")
}

/// Extract the extension (including the leading dot) from a filename.
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        // A leading dot is a hidden file, not an extension.
        Some(idx) if idx > 0 => &filename[idx..],
        _ => "",
    }
}

/// Build the object key for an analytics CSV export dated `at`.
pub fn analytics_key(at: Timestamp) -> String {
    let folder = format!("{}-{}", at.year(), month_abbrev(at.month()));
    let file = format!("{}-{}-{}.csv", at.year(), at.month(), at.day());
    format!("analytics/{folder}/{file}")
}

/// Public HTTPS URL for an object in a bucket (virtual-hosted S3 style).
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}
