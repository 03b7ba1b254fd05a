//! New-horse form: input bookkeeping, required-field checks, text
//! normalization, parent pickers and photo previews.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;
use uuid::Uuid;

use crate::horse::{Horse, HorseId, NewHorse, Sex};

// =============================================================================
// Fields
// =============================================================================

/// Form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Breed,
    Age,
    Sex,
    Father,
    Mother,
    Photo,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Breed,
        FormField::Age,
        FormField::Sex,
        FormField::Father,
        FormField::Mother,
        FormField::Photo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Breed => "Breed",
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Photo => "Photo",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::Breed | Self::Age | Self::Sex)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which parent slot a selection fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    /// Sex a candidate must have to be offered for this slot.
    pub fn sex(self) -> Sex {
        match self {
            Self::Father => Sex::Male,
            Self::Mother => Sex::Female,
        }
    }

    pub fn field(self) -> FormField {
        match self {
            Self::Father => FormField::Father,
            Self::Mother => FormField::Mother,
        }
    }
}

/// Label for the "no parent" choice in parent pickers.
pub const NO_PARENT_LABEL: &str = "None registered";

/// Errors that block submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    MissingField(FormField),

    #[error("Age must be a whole number of years, got '{0}'")]
    InvalidAge(String),

    #[error("Sex must be Male or Female, got '{0}'")]
    InvalidSex(String),

    #[error("{0} is not a supported image (PNG, JPEG, GIF or WebP)")]
    NotAnImage(String),
}

// =============================================================================
// Form State
// =============================================================================

/// Raw input for a new horse, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HorseForm {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub sex: String,
    /// Selected father id; empty means none.
    pub father_id: String,
    /// Selected mother id; empty means none.
    pub mother_id: String,
    pub photo: Option<PhotoUpload>,
}

impl HorseForm {
    /// Text value of a field. The photo field shows the file name.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Breed => &self.breed,
            FormField::Age => &self.age,
            FormField::Sex => &self.sex,
            FormField::Father => &self.father_id,
            FormField::Mother => &self.mother_id,
            FormField::Photo => self.photo.as_ref().map_or("", |p| p.file_name.as_str()),
        }
    }

    /// Set a text field. The photo is attached with [`HorseForm::photo`] instead.
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Breed => self.breed = value,
            FormField::Age => self.age = value,
            FormField::Sex => self.sex = value,
            FormField::Father => self.father_id = value,
            FormField::Mother => self.mother_id = value,
            FormField::Photo => {}
        }
    }

    /// Required fields that are still blank.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.value(*field).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Check required fields and build the insert payload.
    ///
    /// Name, breed and sex are capitalized word by word; empty parent
    /// selections become absent references.
    pub fn validate(&self) -> Result<NewHorse, FormError> {
        if let Some(field) = self.missing_fields().into_iter().next() {
            return Err(FormError::MissingField(field));
        }

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| FormError::InvalidAge(self.age.trim().to_string()))?;

        let sex_text = capitalize_words(self.sex.trim());
        let sex = sex_text
            .parse::<Sex>()
            .map_err(|_| FormError::InvalidSex(sex_text.clone()))?;

        Ok(NewHorse {
            name: capitalize_words(self.name.trim()),
            breed: capitalize_words(self.breed.trim()),
            age,
            sex,
            photo_url: None,
            father_id: optional_id(&self.father_id),
            mother_id: optional_id(&self.mother_id),
        })
    }
}

fn optional_id(value: &str) -> Option<HorseId> {
    let value = value.trim();
    (!value.is_empty()).then(|| HorseId::new(value))
}

// =============================================================================
// Normalization
// =============================================================================

/// Segment delimiters for [`capitalize_words`].
fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '/' | '-' | '\'' | '"')
}

/// Uppercase the first letter of every word-like segment.
///
/// Segments are separated by whitespace and `/ - ' "`. Other letters are
/// left as typed.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;

    for ch in text.chars() {
        if is_word_boundary(ch) {
            out.push(ch);
            at_start = true;
        } else if at_start {
            out.extend(ch.to_uppercase());
            at_start = false;
        } else {
            out.push(ch);
        }
    }

    out
}

/// Horses eligible for a parent slot, alphabetically by name.
pub fn parent_candidates(all: &[Horse], role: ParentRole) -> Vec<&Horse> {
    let mut candidates: Vec<&Horse> = all
        .iter()
        .filter(|horse| horse.sex == Some(role.sex()))
        .collect();
    candidates.sort_by_cached_key(|horse| horse.name.to_lowercase());
    candidates
}

// =============================================================================
// Photos
// =============================================================================

/// Image formats accepted for horse photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Webp => "WebP",
        }
    }
}

/// What the form shows for a selected photo before it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPreview {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    /// Inline `data:` URL for immediate display.
    pub data_url: String,
}

impl PhotoPreview {
    /// Identify the image and read its dimensions from the header.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (format, width, height) = sniff_png(bytes)
            .or_else(|| sniff_gif(bytes))
            .or_else(|| sniff_jpeg(bytes))
            .or_else(|| sniff_webp(bytes))?;

        Some(Self {
            format,
            width,
            height,
            size: bytes.len(),
            data_url: format!("data:{};base64,{}", format.mime(), BASE64.encode(bytes)),
        })
    }
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 2)?;
    Some(u32::from(u16::from_be_bytes([b[0], b[1]])))
}

fn le_u16(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 2)?;
    Some(u32::from(u16::from_le_bytes([b[0], b[1]])))
}

fn le_u24(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 3)?;
    Some(u32::from(b[0]) | u32::from(b[1]) << 8 | u32::from(b[2]) << 16)
}

fn sniff_png(bytes: &[u8]) -> Option<(ImageFormat, u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if !bytes.starts_with(SIGNATURE) || bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
    Some((ImageFormat::Png, width, height))
}

fn sniff_gif(bytes: &[u8]) -> Option<(ImageFormat, u32, u32)> {
    if !(bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")) {
        return None;
    }
    Some((ImageFormat::Gif, le_u16(bytes, 6)?, le_u16(bytes, 8)?))
}

/// Walk JPEG segments up to the first start-of-frame marker.
fn sniff_jpeg(bytes: &[u8]) -> Option<(ImageFormat, u32, u32)> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut i = 2;
    while i + 1 < bytes.len() {
        if bytes[i] != 0xFF {
            return None;
        }
        let marker = bytes[i + 1];
        match marker {
            // Fill byte before a marker.
            0xFF => {
                i += 1;
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD8 => {
                i += 2;
                continue;
            }
            // End of image or start of scan before any frame header.
            0xD9 | 0xDA => return None,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let height = be_u16(bytes, i + 5)?;
                let width = be_u16(bytes, i + 7)?;
                return Some((ImageFormat::Jpeg, width, height));
            }
            _ => {}
        }
        let length = be_u16(bytes, i + 2)? as usize;
        i += 2 + length;
    }

    None
}

fn sniff_webp(bytes: &[u8]) -> Option<(ImageFormat, u32, u32)> {
    if bytes.get(0..4)? != b"RIFF" || bytes.get(8..12)? != b"WEBP" {
        return None;
    }

    let (width, height) = match bytes.get(12..16)? {
        b"VP8 " => (le_u16(bytes, 26)? & 0x3FFF, le_u16(bytes, 28)? & 0x3FFF),
        b"VP8L" => {
            let b = bytes.get(21..25)?;
            let (b0, b1, b2, b3) = (u32::from(b[0]), u32::from(b[1]), u32::from(b[2]), u32::from(b[3]));
            let width = 1 + (((b1 & 0x3F) << 8) | b0);
            let height = 1 + (((b3 & 0x0F) << 10) | (b2 << 2) | ((b1 & 0xC0) >> 6));
            (width, height)
        }
        b"VP8X" => (1 + le_u24(bytes, 24)?, 1 + le_u24(bytes, 27)?),
        _ => return None,
    };

    Some((ImageFormat::Webp, width, height))
}

/// A photo selected for upload together with its preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub preview: PhotoPreview,
}

impl PhotoUpload {
    /// Accept a file only if it decodes as a supported image.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FormError> {
        let file_name = file_name.into();
        let preview =
            PhotoPreview::decode(&bytes).ok_or_else(|| FormError::NotAnImage(file_name.clone()))?;
        Ok(Self {
            file_name,
            bytes,
            preview,
        })
    }

    pub fn content_type(&self) -> &'static str {
        self.preview.format.mime()
    }
}

/// Object path for a new upload: a fresh UUID keeping the original
/// extension, under `prefix`.
pub fn photo_object_name(file_name: &str, prefix: &str) -> String {
    let mut name = Uuid::new_v4().to_string();
    if let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    }
}
