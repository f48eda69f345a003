/// Parser states kept on the conditional stack.
///
/// `NotInTarget` is what an empty stack reports and `InEnd` only stands for
/// "a closing directive was just seen"; neither is ever pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    NotInTarget,
    InTargetIf,
    InGenericIf,
    InElse,
    InEnd,
}

use ParseState::*;

impl ParseState {
    /// States that may legally follow `self`.
    pub fn successors(self) -> &'static [ParseState] {
        match self {
            NotInTarget => &[InTargetIf, InGenericIf, NotInTarget],
            InTargetIf => &[InTargetIf, InGenericIf, InElse, InEnd],
            InGenericIf => &[InTargetIf, InGenericIf, InElse, InEnd],
            InElse => &[InTargetIf, InGenericIf, InEnd],
            InEnd => &[NotInTarget, InTargetIf, InGenericIf, InElse, InEnd],
        }
    }

    pub fn can_transition(self, next: ParseState) -> bool {
        self.successors().contains(&next)
    }

    pub fn is_open_if(self) -> bool {
        matches!(self, InTargetIf | InGenericIf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ParseState; 5] = [NotInTarget, InTargetIf, InGenericIf, InElse, InEnd];

    #[test]
    fn test_opening_directives_always_allowed() {
        for state in ALL {
            assert!(state.can_transition(InTargetIf), "{state:?} -> InTargetIf");
            assert!(state.can_transition(InGenericIf), "{state:?} -> InGenericIf");
        }
    }

    #[test]
    fn test_else_only_follows_open_if() {
        for state in ALL {
            let expected = state.is_open_if() || state == InEnd;
            assert_eq!(state.can_transition(InElse), expected, "{state:?} -> InElse");
        }
    }

    #[test]
    fn test_end_needs_open_region() {
        assert!(!NotInTarget.can_transition(InEnd));
        assert!(InTargetIf.can_transition(InEnd));
        assert!(InGenericIf.can_transition(InEnd));
        assert!(InElse.can_transition(InEnd));
    }

    #[test]
    fn test_no_double_else() {
        assert!(!InElse.can_transition(InElse));
    }
}
