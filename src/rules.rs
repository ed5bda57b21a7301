//! Ordered `(predicate, response)` tables evaluated first-match-wins.

pub struct Rule<I: ?Sized, R> {
    predicate: Box<dyn Fn(&I) -> bool>,
    response: R,
}

pub struct RuleSet<I: ?Sized, R> {
    rules: Vec<Rule<I, R>>,
}

impl<I: ?Sized, R> Default for RuleSet<I, R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<I: ?Sized, R> RuleSet<I, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule; earlier rules take precedence.
    pub fn rule(mut self, predicate: impl Fn(&I) -> bool + 'static, response: R) -> Self {
        self.push(predicate, response);
        self
    }

    pub fn push(&mut self, predicate: impl Fn(&I) -> bool + 'static, response: R) {
        self.rules.push(Rule {
            predicate: Box::new(predicate),
            response,
        });
    }

    pub fn evaluate(&self, input: &I) -> Option<&R> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(input))
            .map(|rule| &rule.response)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
