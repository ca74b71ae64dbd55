use super::PuzzleSeed;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Riddle {
    pub question: &'static str,
    pub answer: &'static str,
    pub options: [&'static str; 5],
}

pub const RIDDLES: [Riddle; 3] = [
    Riddle {
        question: "I speak without a mouth and hear without ears. I have no body, but I come alive with the wind.",
        answer: "echo",
        options: ["echo", "whisper", "ghost", "silence", "shadow"],
    },
    Riddle {
        question: "I have cities, but no houses. I have mountains, but no trees. I have water, but no fish. What am I?",
        answer: "map",
        options: ["map", "globe", "dream", "photograph", "landscape"],
    },
    Riddle {
        question: "I fly without wings. I cry without eyes. Whenever I go, darkness flies. What am I?",
        answer: "cloud",
        options: ["cloud", "bat", "wind", "shadow", "storm"],
    },
];

impl Riddle {
    /// The riddle asked on the day after `seed` rewinds.
    pub fn for_day(seed: &impl PuzzleSeed) -> &'static Riddle {
        &RIDDLES[seed.rewind_count() as usize % RIDDLES.len()]
    }

    pub fn is_correct(&self, guess: &str) -> bool {
        guess.trim().eq_ignore_ascii_case(self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::resources::day_clock::DayClock;

    #[test]
    fn test_riddle_cycles_with_rewind_count() {
        assert_eq!(Riddle::for_day(&0).answer, "echo");
        assert_eq!(Riddle::for_day(&1).answer, "map");
        assert_eq!(Riddle::for_day(&2).answer, "cloud");
        assert_eq!(Riddle::for_day(&3).answer, "echo");
        assert_eq!(Riddle::for_day(&u32::MAX), &RIDDLES[u32::MAX as usize % 3]);
    }

    #[test]
    fn test_riddle_follows_clock() {
        let mut clock = DayClock::default();
        assert_eq!(Riddle::for_day(&clock), &RIDDLES[0]);
        clock.restore(2);
        assert_eq!(Riddle::for_day(&clock), &RIDDLES[2]);
    }

    #[test]
    fn test_every_answer_is_an_option() {
        for riddle in &RIDDLES {
            assert!(riddle.options.contains(&riddle.answer), "{}", riddle.question);
        }
    }

    #[test]
    fn test_is_correct_ignores_case_and_whitespace() {
        let riddle = &RIDDLES[0];
        assert!(riddle.is_correct("echo"));
        assert!(riddle.is_correct("  Echo\n"));
        assert!(!riddle.is_correct("ghost"));
        assert!(!riddle.is_correct(""));
    }
}
