//! Random display names for new accounts

use rand::seq::SliceRandom;

const ADJECTIVES: &[&str] = &[
    "용감한", "차분한", "기쁜", "행복한", "사랑스러운", "친절한", "지혜로운", "강한",
    "부지런한", "명랑한", "조용한", "밝은", "희망찬", "믿음직한", "성실한", "온유한",
    "겸손한", "충성스러운", "신실한", "감사한",
];

const GIVEN_NAMES: &[&str] = &[
    "요한", "바울", "베드로", "야고보", "안드레", "빌립", "도마", "마태", "나다니엘", "시몬",
    "다대오", "유다", "마리아", "마르다", "엘리사벳", "안나", "룻", "에스더", "드보라", "사라",
    "다니엘",
];

/// `"<adjective> <given name>"`
pub fn random_display_name() -> String {
    let mut rng = rand::thread_rng();
    // Both lists are non-empty constants
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("기쁜");
    let given = GIVEN_NAMES.choose(&mut rng).copied().unwrap_or("요한");
    format!("{} {}", adjective, given)
}
