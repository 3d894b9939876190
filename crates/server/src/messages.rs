//! User-facing text for every error code. The menu UI is Danish.

use shared::error::ErrorCode;

/// Banner text on the HTML pages.
pub(crate) fn page_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::NameMissing => {
            "Fejl: Navn må ikke være tomt. Indtast venligst et navn på retten."
        }
        ErrorCode::InvalidPrice => {
            "Fejl: Pris skal være et positivt tal. Indtast venligst en gyldig pris."
        }
        ErrorCode::NegativePrice => {
            "Fejl: Pris skal være positiv. Indtast venligst et positivt tal."
        }
        ErrorCode::DatabaseError => "Fejl: Der opstod en database fejl. Prøv igen senere.",
        ErrorCode::ItemNotFound | ErrorCode::NotFound => {
            "Fejl: Den ønskede ret blev ikke fundet."
        }
    }
}

/// `message` field of JSON error bodies.
pub(crate) fn api_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::NameMissing => "Navn må ikke være tomt",
        ErrorCode::InvalidPrice => "Pris skal være et positivt tal",
        ErrorCode::NegativePrice => "Pris skal være positiv",
        ErrorCode::DatabaseError => "Database fejl",
        ErrorCode::ItemNotFound | ErrorCode::NotFound => "Menu item ikke fundet",
    }
}
