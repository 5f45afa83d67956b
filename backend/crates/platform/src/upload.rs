//! Upload route configuration
//!
//! The actual file transfer is delegated to an external upload service;
//! this module only declares, per content category, what the service is
//! allowed to accept. The API exposes the table so clients can validate
//! before uploading.

use serde::Serialize;

/// One upload route: a content category with its constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRoute {
    /// Route name the client addresses the upload service with
    pub name: &'static str,
    /// Accepted MIME type prefixes ("image", "video", "application/pdf", ...)
    pub accepted_types: &'static [&'static str],
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
    /// Maximum number of files per upload
    pub max_file_count: u32,
}

impl UploadRoute {
    /// Whether a MIME type is accepted on this route
    pub fn accepts(&self, mime: &str) -> bool {
        self.accepted_types
            .iter()
            .any(|prefix| mime == *prefix || mime.starts_with(&format!("{}/", prefix)))
    }

    /// Whether a file size (bytes) is within the route's limit
    pub fn within_size(&self, bytes: u64) -> bool {
        bytes <= self.max_file_size_mb * 1024 * 1024
    }
}

/// Upload routes for the platform's content categories
pub const UPLOAD_ROUTES: &[UploadRoute] = &[
    UploadRoute {
        name: "courseBanner",
        accepted_types: &["image"],
        max_file_size_mb: 4,
        max_file_count: 1,
    },
    UploadRoute {
        name: "sectionVideo",
        accepted_types: &["video"],
        max_file_size_mb: 4096,
        max_file_count: 1,
    },
    UploadRoute {
        name: "sectionResource",
        accepted_types: &["text", "image", "video", "audio", "application/pdf"],
        max_file_size_mb: 64,
        max_file_count: 4,
    },
    UploadRoute {
        name: "assignmentSubmission",
        accepted_types: &["text", "image", "application/pdf"],
        max_file_size_mb: 32,
        max_file_count: 1,
    },
    UploadRoute {
        name: "educatorMaterial",
        accepted_types: &["application/pdf", "image", "video", "audio"],
        max_file_size_mb: 256,
        max_file_count: 1,
    },
];

/// Look up a route by name
pub fn route(name: &str) -> Option<&'static UploadRoute> {
    UPLOAD_ROUTES.iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_lookup() {
        assert!(route("courseBanner").is_some());
        assert!(route("sectionVideo").is_some());
        assert!(route("nope").is_none());
    }

    #[test]
    fn test_accepts_mime_prefixes() {
        let banner = route("courseBanner").unwrap();
        assert!(banner.accepts("image/png"));
        assert!(banner.accepts("image/jpeg"));
        assert!(!banner.accepts("video/mp4"));

        let resource = route("sectionResource").unwrap();
        assert!(resource.accepts("application/pdf"));
        assert!(resource.accepts("text/plain"));
        assert!(!resource.accepts("application/zip"));
    }

    #[test]
    fn test_size_limits() {
        let banner = route("courseBanner").unwrap();
        assert!(banner.within_size(4 * 1024 * 1024));
        assert!(!banner.within_size(4 * 1024 * 1024 + 1));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(route("courseBanner").unwrap()).unwrap();
        assert_eq!(json["maxFileSizeMb"], 4);
        assert_eq!(json["name"], "courseBanner");
    }
}
