use lazy_regex::regex;

/// Answers accepted as confirmation. Matched against the whole trimmed input.
pub const AFFIRMATIVES: [&str; 3] = ["맞아", "네", "예"];
/// Answers that reject the heard number. Matched against the whole trimmed input.
pub const NEGATIVES: [&str; 4] = ["아니야", "아니", "틀려", "다시"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserReply {
    Affirm,
    Deny,
    Number(u32),
    /// Sounds like agreement but is not one of the exact affirmatives.
    Loose,
    Other,
}

/// Leftmost run of two or three ASCII digits. Longer runs yield their first three digits.
pub fn extract_number(text: &str) -> Option<u32> {
    regex!(r"[0-9]{2,3}")
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

pub fn is_affirmative(text: &str) -> bool {
    AFFIRMATIVES.contains(&text.trim())
}

pub fn is_negative(text: &str) -> bool {
    NEGATIVES.contains(&text.trim())
}

pub fn is_loose_affirmative(text: &str) -> bool {
    regex!(r"응\s*맞아|응|맞는\s*것\s*같아").is_match(text.trim())
}

/// Classifies an answer given while a number is waiting for confirmation.
///
/// Exact answers win over everything else, then a corrected number, then the
/// loose forms of agreement.
pub fn classify(text: &str) -> UserReply {
    let text = text.trim();
    if is_affirmative(text) {
        UserReply::Affirm
    } else if is_negative(text) {
        UserReply::Deny
    } else if let Some(n) = extract_number(text) {
        UserReply::Number(n)
    } else if is_loose_affirmative(text) {
        UserReply::Loose
    } else {
        UserReply::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_two_or_three_digit_run() {
        assert_eq!(extract_number("공복혈당 145"), Some(145));
        assert_eq!(extract_number("아침 98, 저녁 130"), Some(98));
        assert_eq!(extract_number("혈압은 1205"), Some(120));
        assert_eq!(extract_number("7시에 먹었어요"), None);
        assert_eq!(extract_number("오늘은 괜찮아요"), None);
    }

    #[test]
    fn ignores_non_ascii_digits() {
        assert_eq!(extract_number("١٤٥"), None);
    }

    #[test]
    fn exact_answers_only_match_whole_input() {
        assert_eq!(classify(" 맞아 "), UserReply::Affirm);
        assert_eq!(classify("네"), UserReply::Affirm);
        assert_eq!(classify("예"), UserReply::Affirm);
        assert_eq!(classify("아니"), UserReply::Deny);
        assert_eq!(classify("다시"), UserReply::Deny);
        assert_eq!(classify("맞아요 맞아"), UserReply::Other);
    }

    #[test]
    fn loose_agreement_is_not_confirmation() {
        assert_eq!(classify("응"), UserReply::Loose);
        assert_eq!(classify("응 맞아"), UserReply::Loose);
        assert_eq!(classify("맞는 것 같아"), UserReply::Loose);
    }

    #[test]
    fn corrected_number_beats_loose_agreement() {
        assert_eq!(classify("응 132"), UserReply::Number(132));
        assert_eq!(classify("아니 132야"), UserReply::Number(132));
    }
}
