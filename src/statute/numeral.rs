use serde::Serialize;

const MARKER_GLYPHS: [char; 5] = ['第', '条', '章', '節', '款'];
const ORDINAL_JOINER: char = 'の';

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumeralSystem {
    Kanji,
    Arabic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumeralToken {
    pub system: NumeralSystem,
    pub label: String,
    pub value: String,
    pub suffix: Option<String>,
}

impl NumeralToken {
    pub fn parse(system: NumeralSystem, label: &str) -> Self {
        let label = label.trim();
        let (base, ordinal) = split_secondary_ordinal(label);

        let value = digits_to_decimal(system, base).to_string();
        let suffix = ordinal.map(|ordinal| format!("_{}", digits_to_decimal(system, ordinal)));

        Self {
            system,
            label: label.to_string(),
            value,
            suffix,
        }
    }

    /// Decimal identifier, e.g. `37_2` for an article inserted after article 37.
    pub fn decimal_id(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", self.value, suffix),
            None => self.value.clone(),
        }
    }
}

fn split_secondary_ordinal(label: &str) -> (&str, Option<&str>) {
    match label.split_once(ORDINAL_JOINER) {
        Some((base, ordinal)) if !ordinal.trim().is_empty() => (base, Some(ordinal)),
        Some((base, _)) => (base, None),
        None => (label, None),
    }
}

fn digits_to_decimal(system: NumeralSystem, token: &str) -> u32 {
    let digits = token
        .chars()
        .filter(|ch| !MARKER_GLYPHS.contains(ch) && !ch.is_whitespace());

    match system {
        NumeralSystem::Kanji => kanji_value(digits),
        NumeralSystem::Arabic => arabic_value(digits),
    }
}

fn kanji_digit(ch: char) -> Option<u32> {
    let value = match ch {
        '〇' | '零' => 0,
        '一' => 1,
        '二' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        _ => return None,
    };
    Some(value)
}

fn kanji_value(glyphs: impl Iterator<Item = char>) -> u32 {
    let mut result = 0u32;
    let mut current = 0u32;

    for ch in glyphs {
        let multiplier = match ch {
            '十' => Some(10),
            '百' => Some(100),
            '千' => Some(1000),
            _ => None,
        };

        if let Some(multiplier) = multiplier {
            let factor = if current == 0 { 1 } else { current };
            result = result.saturating_add(factor * multiplier);
            current = 0;
            continue;
        }

        // Unknown glyphs reset the pending digit; malformed tokens degrade instead of failing.
        current = kanji_digit(ch).unwrap_or(0);
    }

    result.saturating_add(current)
}

fn arabic_value(glyphs: impl Iterator<Item = char>) -> u32 {
    glyphs
        .filter_map(|ch| match ch {
            '0'..='9' => ch.to_digit(10),
            '０'..='９' => Some(ch as u32 - '０' as u32),
            _ => None,
        })
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}
