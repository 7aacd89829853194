//! Slug derivation.

/// Derives a lowercase, hyphen-separated ASCII identifier from `text`.
///
/// Known accented letters and a few symbols are transliterated first;
/// every other character outside `[A-Za-z0-9]` and whitespace is removed.
/// Hyphens count as whitespace. Whitespace runs become one `-`, and
/// leading or trailing separators are dropped.
///
/// The function is total and idempotent.
pub fn slugify(text: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '-' {
            kept.push(' ');
        } else if let Some(ascii) = transliterate(ch) {
            kept.push_str(ascii);
        } else if ch.is_ascii_alphanumeric() || ch.is_whitespace() {
            kept.push(ch);
        }
    }

    let mut slug = String::with_capacity(kept.len());
    for word in kept.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(word.chars().map(|c| c.to_ascii_lowercase()));
    }
    slug
}

/// ASCII replacement for characters the slug alphabet would otherwise drop.
fn transliterate(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ŷ' | 'Ÿ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        '&' => "and",
        '%' => "percent",
        '$' => "dollar",
        '<' => "less",
        '>' => "greater",
        '|' => "or",
        '©' => "c",
        '®' => "r",
        _ => return None,
    };
    Some(ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Acme River Watch"), "acme-river-watch");
        assert_eq!(slugify("  Bear   Creek\t"), "bear-creek");
    }

    #[test]
    fn hyphens_collapse_with_whitespace() {
        assert_eq!(slugify("Upper - Lower"), "upper-lower");
        assert_eq!(slugify("--a--b--"), "a-b");
    }

    #[test]
    fn punctuation_is_removed_without_separating() {
        assert_eq!(slugify("St. John's River"), "st-johns-river");
        assert_eq!(slugify("site_id_01"), "siteid01");
        assert_eq!(slugify("Lake (North)"), "lake-north");
    }

    #[test]
    fn transliterates_known_characters() {
        assert_eq!(slugify("Rivière Saint-Léon"), "riviere-saint-leon");
        assert_eq!(slugify("Straße & Ørsted"), "strasse-and-orsted");
        assert_eq!(slugify("100% Clean"), "100percent-clean");
    }

    #[test]
    fn unknown_characters_are_dropped() {
        assert_eq!(slugify("河 River"), "river");
        assert_eq!(slugify("💧"), "");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("..."), "");
    }
}
