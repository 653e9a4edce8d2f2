//! Code tables: sky cover and flight category labels, plus the phonetic
//! alphabet used when a report is read aloud.

/// Human label for a sky cover code. Unknown codes are returned unchanged.
pub fn sky_cover_label(code: &str) -> &str {
    match code {
        "SKC" => "Clear Skies",
        "FEW" => "Few Clouds",
        "SCT" => "Scattered Clouds",
        "BKN" => "Broken Clouds",
        "OVC" => "Overcast",
        other => other,
    }
}

/// Spoken label for a flight category code. Unknown codes are returned unchanged.
pub fn flight_category_label(code: &str) -> &str {
    match code {
        "VFR" => "VFR",
        "MVFR" => "marginal VFR",
        "SVFR" => "special VFR",
        "IFR" => "IFR",
        "LIFR" => "low IFR",
        other => other,
    }
}

fn phonetic_word(c: char) -> Option<&'static str> {
    let word = match c.to_ascii_uppercase() {
        'A' => "Alfa",
        'B' => "Bravo",
        'C' => "Charlie",
        'D' => "Delta",
        'E' => "Echo",
        'F' => "Foxtrot",
        'G' => "Golf",
        'H' => "Hotel",
        'I' => "India",
        'J' => "Juliett",
        'K' => "Kilo",
        'L' => "Lima",
        'M' => "Mike",
        'N' => "November",
        'O' => "Oscar",
        'P' => "Papa",
        'Q' => "Quebec",
        'R' => "Romeo",
        'S' => "Sierra",
        'T' => "Tango",
        'U' => "Uniform",
        'V' => "Victor",
        'W' => "Whiskey",
        'X' => "X-ray",
        'Y' => "Yankee",
        'Z' => "Zulu",
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        '9' => "Niner",
        '.' => "Decimal",
        '-' => "Minus",
        _ => return None,
    };
    Some(word)
}

/// Spell a token character by character with the ICAO phonetic alphabet.
///
/// `"CYYZ"` becomes `"Charlie Yankee Yankee Zulu"`. Characters without a
/// spoken form are dropped.
pub fn spell_phonetic(token: &str) -> String {
    token
        .chars()
        .filter_map(phonetic_word)
        .collect::<Vec<_>>()
        .join(" ")
}
