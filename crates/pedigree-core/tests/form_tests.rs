use pedigree_core::form::{
    capitalize_words, parent_candidates, photo_object_name, FormError, FormField, HorseForm,
    ImageFormat, ParentRole, PhotoPreview, PhotoUpload,
};
use pedigree_core::horse::{Horse, HorseId, Sex};

fn filled() -> HorseForm {
    HorseForm {
        name: "  trovão azul ".to_string(),
        breed: "quarter horse".to_string(),
        age: " 7 ".to_string(),
        sex: "macho".to_string(),
        ..HorseForm::default()
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec();
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

// =============================================================================
// Capitalization
// =============================================================================

#[test]
fn test_capitalize_words() {
    assert_eq!(capitalize_words("quarter horse"), "Quarter Horse");
    assert_eq!(capitalize_words("o'neil"), "O'Neil");
    assert_eq!(capitalize_words("mangalarga-marchador"), "Mangalarga-Marchador");
    assert_eq!(capitalize_words("árabe/puro"), "Árabe/Puro");
    assert_eq!(capitalize_words("say \"hi\""), "Say \"Hi\"");
}

#[test]
fn test_capitalize_leaves_other_letters() {
    assert_eq!(capitalize_words("mcDONALD"), "McDONALD");
    assert_eq!(capitalize_words(""), "");
    assert_eq!(capitalize_words("a  b"), "A  B");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_normalizes_input() {
    let horse = filled().validate().unwrap();
    assert_eq!(horse.name, "Trovão Azul");
    assert_eq!(horse.breed, "Quarter Horse");
    assert_eq!(horse.age, 7);
    assert_eq!(horse.sex, Sex::Male);
    assert_eq!(horse.father_id, None);
    assert_eq!(horse.mother_id, None);
    assert_eq!(horse.photo_url, None);
}

#[test]
fn test_missing_fields_in_order() {
    let form = HorseForm {
        breed: "Crioulo".to_string(),
        sex: "   ".to_string(),
        ..HorseForm::default()
    };
    assert_eq!(
        form.missing_fields(),
        vec![FormField::Name, FormField::Age, FormField::Sex]
    );
    assert!(!form.is_complete());
    assert_eq!(
        form.validate().unwrap_err(),
        FormError::MissingField(FormField::Name)
    );
}

#[test]
fn test_parents_and_photo_are_optional() {
    let form = filled();
    assert!(form.is_complete());
    assert!(!FormField::Father.is_required());
    assert!(!FormField::Photo.is_required());
}

#[test]
fn test_invalid_age() {
    let mut form = filled();
    form.age = "seven".to_string();
    assert_eq!(
        form.validate().unwrap_err(),
        FormError::InvalidAge("seven".to_string())
    );
    form.age = "-1".to_string();
    assert!(matches!(form.validate(), Err(FormError::InvalidAge(_))));
}

#[test]
fn test_invalid_sex() {
    let mut form = filled();
    form.sex = "gelding".to_string();
    assert_eq!(
        form.validate().unwrap_err(),
        FormError::InvalidSex("Gelding".to_string())
    );
}

#[test]
fn test_selected_parents_pass_through() {
    let mut form = filled();
    form.set(FormField::Father, "12".to_string());
    form.set(FormField::Mother, " ".to_string());
    let horse = form.validate().unwrap();
    assert_eq!(horse.father_id, Some(HorseId::new("12")));
    assert_eq!(horse.mother_id, None);
}

#[test]
fn test_payload_omits_absent_fields() {
    let json = serde_json::to_value(filled().validate().unwrap()).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("fatherId"));
    assert!(!object.contains_key("motherId"));
    assert!(!object.contains_key("photoUrl"));
    assert_eq!(json["sex"], "Male");
    assert_eq!(json["age"], 7);
}

// =============================================================================
// Parent pickers
// =============================================================================

#[test]
fn test_parent_candidates_filter_and_sort() {
    let horses = vec![
        Horse::new("1", "zorro").with_sex(Sex::Male),
        Horse::new("2", "Bela").with_sex(Sex::Female),
        Horse::new("3", "Atlas").with_sex(Sex::Male),
        Horse::new("4", "Unknown"),
        Horse::new("5", "amigo").with_sex(Sex::Male),
    ];

    let fathers: Vec<&str> = parent_candidates(&horses, ParentRole::Father)
        .iter()
        .map(|h| h.name.as_str())
        .collect();
    assert_eq!(fathers, vec!["amigo", "Atlas", "zorro"]);

    let mothers = parent_candidates(&horses, ParentRole::Mother);
    assert_eq!(mothers.len(), 1);
    assert_eq!(mothers[0].name, "Bela");

    assert!(parent_candidates(&[], ParentRole::Mother).is_empty());
}

// =============================================================================
// Photos
// =============================================================================

#[test]
fn test_png_preview() {
    let bytes = png(640, 480);
    let preview = PhotoPreview::decode(&bytes).unwrap();
    assert_eq!(preview.format, ImageFormat::Png);
    assert_eq!((preview.width, preview.height), (640, 480));
    assert_eq!(preview.size, bytes.len());
    assert!(preview.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[test]
fn test_jpeg_preview_skips_segments() {
    let mut bytes = vec![0xFF, 0xD8];
    // APP0 segment of length 16.
    bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    bytes.extend_from_slice(&[0u8; 14]);
    // SOF0: length, precision, height 300, width 400.
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x01, 0x2C, 0x01, 0x90]);
    bytes.extend_from_slice(&[0u8; 12]);

    let preview = PhotoPreview::decode(&bytes).unwrap();
    assert_eq!(preview.format, ImageFormat::Jpeg);
    assert_eq!((preview.width, preview.height), (400, 300));
}

#[test]
fn test_webp_extended_preview() {
    let mut bytes = b"RIFF\x00\x00\x00\x00WEBPVP8X".to_vec();
    bytes.extend_from_slice(&[0x0A, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    // Canvas 1024 x 768, stored minus one.
    bytes.extend_from_slice(&[0xFF, 0x03, 0x00]);
    bytes.extend_from_slice(&[0xFF, 0x02, 0x00]);

    let preview = PhotoPreview::decode(&bytes).unwrap();
    assert_eq!(preview.format, ImageFormat::Webp);
    assert_eq!((preview.width, preview.height), (1024, 768));
}

#[test]
fn test_non_image_rejected() {
    let err = PhotoUpload::new("notes.txt", b"just some text".to_vec()).unwrap_err();
    assert_eq!(err, FormError::NotAnImage("notes.txt".to_string()));
    assert!(PhotoPreview::decode(&[]).is_none());
    assert!(PhotoPreview::decode(b"\x89PNG\r\n\x1a\n").is_none());
}

#[test]
fn test_upload_content_type_from_bytes() {
    // The extension lies; the bytes decide.
    let upload = PhotoUpload::new("photo.jpg", png(1, 1)).unwrap();
    assert_eq!(upload.content_type(), "image/png");
}

#[test]
fn test_object_name_keeps_extension() {
    let name = photo_object_name("Estrela.JPEG", "photos");
    assert!(name.starts_with("photos/"));
    assert!(name.ends_with(".JPEG"));
    // prefix + uuid (36) + ".JPEG"
    assert_eq!(name.len(), "photos/".len() + 36 + 5);

    assert_ne!(name, photo_object_name("Estrela.JPEG", "photos"));
}

#[test]
fn test_object_name_without_extension_or_prefix() {
    let name = photo_object_name("snapshot", "/");
    assert_eq!(name.len(), 36);
    assert!(!name.contains('/'));
}
