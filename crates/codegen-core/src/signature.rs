//! Embedding and checking content signatures.
//!
//! A signed file carries one token in its doc-block:
//!
//! ```text
//! @generated SignedSource<<3f0c…64 hex digits…>>
//! @partially-generated SignedSource<<…>>
//! ```
//!
//! The hash is a SHA-256 over the whole text with the hash slot holding a
//! fixed placeholder of the same length. For partially generated files the
//! content of every manual section is removed before hashing, so edits
//! inside manual sections keep the signature valid while any other edit
//! breaks it.

use crate::{Error, Result};
use codegen_blocks::{RegionMarker, strip_manual_content};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_LEN: usize = 64;

const PLACEHOLDER: &str = "*O*zOeWoEQle#+L!plEphiEmie@IsG*O*zOeWoEQle#+L!plEphiEmie@IsG*O*z";
const _: () = assert!(PLACEHOLDER.len() == HASH_LEN);

const TOKEN_OPEN: &str = "SignedSource<<";
const TOKEN_CLOSE: &str = ">>";

/// Any token shape, including damaged ones; the slot is validated separately.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(generated|partially-generated) SignedSource<<([^>\n]*)(>>)?")
        .expect("Invalid signature token regex")
});

/// Whether a file may contain manual sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Entirely generator-owned; any edit invalidates the signature.
    Generated,
    /// Edits are allowed inside manual sections.
    PartiallyGenerated,
}

impl FileKind {
    /// The doc tag that precedes the token.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Generated => "@generated",
            Self::PartiallyGenerated => "@partially-generated",
        }
    }

    fn from_tag_name(name: &str) -> Self {
        if name == "partially-generated" {
            Self::PartiallyGenerated
        } else {
            Self::Generated
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated => write!(f, "generated"),
            Self::PartiallyGenerated => write!(f, "partially generated"),
        }
    }
}

/// Outcome of [`SignatureCodec::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureVerdict {
    /// The signature matches the text.
    Valid(FileKind),
    /// A signature is present but does not match.
    Invalid(FileKind),
    /// No signature token at all; the text was never generated.
    Absent,
}

/// Signs and verifies text. Holds the marker style needed to find manual
/// sections in partially generated files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureCodec {
    marker: RegionMarker,
}

impl SignatureCodec {
    pub fn new(marker: RegionMarker) -> Self {
        Self { marker }
    }

    /// The unsigned token to place in rendered text before [`sign`](Self::sign).
    pub fn signing_token(kind: FileKind) -> String {
        format!("{} {TOKEN_OPEN}{PLACEHOLDER}{TOKEN_CLOSE}", kind.tag())
    }

    /// Whether `text` carries a signature token of either kind, intact or
    /// not. An unfilled placeholder does not count.
    pub fn is_signed(text: &str) -> bool {
        signed_tokens(text).next().is_some()
    }

    /// Replace the placeholder in `text` with the hash of `text`.
    ///
    /// # Errors
    /// [`Error::SigningToken`] unless the placeholder token for `kind`
    /// appears exactly once; a manual-section error if a partially generated
    /// text has unbalanced markers.
    pub fn sign(&self, kind: FileKind, text: &str) -> Result<String> {
        let token = Self::signing_token(kind);
        let found: Vec<usize> = text.match_indices(&token).map(|(at, _)| at).collect();
        let &[start] = found.as_slice() else {
            return Err(Error::SigningToken {
                kind,
                found: found.len(),
            });
        };

        let hash = self.digest(kind, text)?;
        let slot = start + kind.tag().len() + 1 + TOKEN_OPEN.len();

        let mut signed = String::with_capacity(text.len());
        signed.push_str(&text[..slot]);
        signed.push_str(&hash);
        signed.push_str(&text[slot + HASH_LEN..]);
        Ok(signed)
    }

    /// Check the signature embedded in `text`.
    ///
    /// A token whose hash slot is damaged (wrong length, non-hex, missing
    /// `>>`) is [`Invalid`](SignatureVerdict::Invalid), not absent.
    pub fn verify(&self, text: &str) -> SignatureVerdict {
        let mut tokens = signed_tokens(text);
        let Some(token) = tokens.next() else {
            return SignatureVerdict::Absent;
        };
        let (Some(tag), Some(hash)) = (token.get(1), token.get(2)) else {
            return SignatureVerdict::Absent;
        };
        let kind = FileKind::from_tag_name(tag.as_str());

        if tokens.next().is_some() {
            tracing::debug!("More than one signature token found");
            return SignatureVerdict::Invalid(kind);
        }
        if token.get(3).is_none() || !is_hex_digest(hash.as_str()) {
            tracing::debug!(slot = hash.as_str(), "Malformed signature token");
            return SignatureVerdict::Invalid(kind);
        }

        let unsigned = format!(
            "{}{}{}",
            &text[..hash.start()],
            PLACEHOLDER,
            &text[hash.end()..]
        );
        match self.digest(kind, &unsigned) {
            Ok(expected) if expected == hash.as_str() => SignatureVerdict::Valid(kind),
            Ok(_) => SignatureVerdict::Invalid(kind),
            Err(e) => {
                tracing::debug!(error = %e, "Cannot isolate generated code for verification");
                SignatureVerdict::Invalid(kind)
            }
        }
    }

    fn digest(&self, kind: FileKind, unsigned: &str) -> Result<String> {
        let hashed = match kind {
            FileKind::Generated => Cow::Borrowed(unsigned),
            FileKind::PartiallyGenerated => {
                Cow::Owned(strip_manual_content(unsigned, &self.marker)?)
            }
        };
        let mut hasher = Sha256::new();
        hasher.update(hashed.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Tokens in `text`, skipping unfilled placeholders.
fn signed_tokens(text: &str) -> impl Iterator<Item = regex::Captures<'_>> {
    TOKEN_REGEX
        .captures_iter(text)
        .filter(|token| token.get(2).is_none_or(|slot| slot.as_str() != PLACEHOLDER))
}

fn is_hex_digest(slot: &str) -> bool {
    slot.len() == HASH_LEN && slot.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
