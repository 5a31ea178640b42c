//! Arabic UI copy for validation failures.
//!
//! `FieldError`'s `Display` stays English for logs; the site renders
//! these messages to visitors instead.

use crate::validation::FieldError;

/// Returns the Arabic message for a field error.
pub fn message_ar(error: &FieldError) -> String {
    match error {
        FieldError::Required => "هذا الحقل مطلوب".to_string(),
        FieldError::TooShort(min) => format!("يجب أن يكون على الأقل {min} أحرف"),
        FieldError::TooLong(max) => format!("يجب أن يكون أقل من {max} حرف"),
        FieldError::DisallowedCharacter(_) => "يحتوي على أحرف غير مسموحة".to_string(),
        FieldError::Email(_) => "البريد الإلكتروني غير صحيح".to_string(),
        FieldError::Phone(_) => "رقم الهاتف غير صحيح".to_string(),
        FieldError::Url(_) => "الرابط غير صحيح".to_string(),
        FieldError::Threat(_) => "المدخل يحتوي على محتوى غير مسموح به".to_string(),
    }
}
