use crate::model::Gender;

/// Interaction state of the card currently on screen.
///
/// A guess only reveals the answer; scoring happens when the caller commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardState {
    #[default]
    AwaitingGuess,
    Revealed(Gender),
}

impl CardState {
    /// Record a guess and return the gender that is now locked in.
    ///
    /// Guessing again after the reveal keeps the first choice.
    pub fn guess(&mut self, chosen: Gender) -> Gender {
        match *self {
            CardState::AwaitingGuess => {
                *self = CardState::Revealed(chosen);
                chosen
            }
            CardState::Revealed(locked) => locked,
        }
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        matches!(self, CardState::Revealed(_))
    }

    #[must_use]
    pub fn chosen(&self) -> Option<Gender> {
        match self {
            CardState::AwaitingGuess => None,
            CardState::Revealed(gender) => Some(*gender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_guess_is_locked_in() {
        let mut state = CardState::default();
        assert!(!state.is_revealed());

        assert_eq!(state.guess(Gender::Feminine), Gender::Feminine);
        assert_eq!(state.guess(Gender::Masculine), Gender::Feminine);
        assert_eq!(state, CardState::Revealed(Gender::Feminine));
        assert_eq!(state.chosen(), Some(Gender::Feminine));
    }
}
