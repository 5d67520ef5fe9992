use serde::{Deserialize, Serialize};

const INLINE_MARKER: &str = "base64";
const JPEG_PREFIX: &str = "data:image/jpeg;base64,";
const PNG_PREFIX: &str = "data:image/png;base64,";

/// Encoding of an inline image payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineEncoding {
    Jpeg,
    Png,
}

impl InlineEncoding {
    pub fn extension(&self) -> &'static str {
        match self {
            InlineEncoding::Jpeg => "jpeg",
            InlineEncoding::Png => "png",
        }
    }
}

/// How the pixel data of a result image is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedSource {
    /// No source attribute; nothing to fetch
    Empty,
    /// Base64 payload embedded in the page
    InlineEncoded {
        encoding: InlineEncoding,
        payload: String,
    },
    /// Image hosted elsewhere
    RemoteUrl(String),
    /// Inline data in an encoding we do not handle
    Indeterminate,
}

impl ClassifiedSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifiedSource::Empty => "empty",
            ClassifiedSource::InlineEncoded { .. } => "inline",
            ClassifiedSource::RemoteUrl(_) => "remote",
            ClassifiedSource::Indeterminate => "indeterminate",
        }
    }
}

/// Classify the `src` attribute of a result image
pub fn classify(src: Option<&str>) -> ClassifiedSource {
    let src = match src.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return ClassifiedSource::Empty,
    };

    if !src.contains(INLINE_MARKER) && !src.starts_with("data:") {
        return ClassifiedSource::RemoteUrl(src.to_string());
    }

    if let Some(payload) = payload_after(src, JPEG_PREFIX) {
        ClassifiedSource::InlineEncoded {
            encoding: InlineEncoding::Jpeg,
            payload,
        }
    } else if let Some(payload) = payload_after(src, PNG_PREFIX) {
        ClassifiedSource::InlineEncoded {
            encoding: InlineEncoding::Png,
            payload,
        }
    } else {
        ::log::debug!("Unrecognized inline source: {:.48}", src);
        ClassifiedSource::Indeterminate
    }
}

fn payload_after(src: &str, prefix: &str) -> Option<String> {
    src.split_once(prefix)
        .map(|(_, payload)| payload.to_string())
        .filter(|payload| !payload.is_empty())
}
