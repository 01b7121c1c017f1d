//! URL slugs for catalog records.

/// Lowercases `text`, folds common Latin diacritics and joins words with `-`.
///
/// ```rust
/// use autoani_kernel::slug::slugify;
///
/// assert_eq!(slugify("BMW X5 M50i xDrive"), "bmw-x5-m50i-xdrive");
/// assert_eq!(slugify("Çmimi i Mirë!"), "cmimi-i-mire");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = !slug.is_empty();
            continue;
        }

        let folded = match ch {
            'a'..='z' | '0'..='9' => None,
            other => Some(fold(other)).filter(|f| !f.is_empty()),
        };
        if !ch.is_ascii_alphanumeric() && folded.is_none() {
            continue;
        }
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        match folded {
            Some(folded) => slug.push_str(folded),
            None => slug.push(ch),
        }
    }

    slug
}

/// Returns `base`, or `base-1`, `base-2`, ... whichever is the first not `taken`.
///
/// ```rust
/// use autoani_kernel::slug::unique_slug;
///
/// let taken = ["bmw-x5", "bmw-x5-1"];
/// assert_eq!(unique_slug("bmw-x5", |s| taken.contains(&s)), "bmw-x5-2");
/// assert_eq!(unique_slug("", |_| false), "item");
/// ```
pub fn unique_slug<F>(base: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = if base.is_empty() { "item" } else { base };
    if !taken(base) {
        return base.to_owned();
    }

    (1_u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_owned())
}

fn fold(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => "",
    }
}
