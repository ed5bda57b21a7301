use clap::ValueEnum;

use crate::rules::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Interest {
    Coding,
    Math,
    Design,
    Biology,
    Business,
    Writing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CareerProfile {
    pub interest: Interest,
    pub average_score: f64,
    pub prefers_teamwork: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerSuggestion {
    pub field: &'static str,
    pub advice: &'static str,
}

pub const FALLBACK: CareerSuggestion = CareerSuggestion {
    field: "Undecided",
    advice: "Book a session with your mentor to explore options.",
};

/// The fixed decision table, in priority order.
pub fn career_rules() -> RuleSet<CareerProfile, CareerSuggestion> {
    use Interest::*;

    RuleSet::<CareerProfile, CareerSuggestion>::new()
        .rule(
            |p: &CareerProfile| p.interest == Coding && p.average_score >= 7.0,
            CareerSuggestion {
                field: "Software Engineering",
                advice: "Build projects and aim for internships in product teams.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Coding,
            CareerSuggestion {
                field: "Web Development",
                advice: "Start with front-end work and grow a portfolio.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Math && p.average_score >= 7.5,
            CareerSuggestion {
                field: "Data Science",
                advice: "Strengthen statistics and learn a data analysis toolkit.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Math,
            CareerSuggestion {
                field: "Accounting and Finance",
                advice: "Look into certification tracks alongside your degree.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Design,
            CareerSuggestion {
                field: "UI/UX Design",
                advice: "Collect design work in a public portfolio.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Biology,
            CareerSuggestion {
                field: "Healthcare and Life Sciences",
                advice: "Seek lab assistant roles and research electives.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Business && p.prefers_teamwork,
            CareerSuggestion {
                field: "Management",
                advice: "Take on club leadership to practise running teams.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Business,
            CareerSuggestion {
                field: "Entrepreneurship",
                advice: "Prototype a small venture and join an incubator program.",
            },
        )
        .rule(
            |p: &CareerProfile| p.interest == Writing,
            CareerSuggestion {
                field: "Content and Journalism",
                advice: "Write regularly for the campus paper or a blog.",
            },
        )
}

pub fn suggest(
    rules: &RuleSet<CareerProfile, CareerSuggestion>,
    profile: &CareerProfile,
) -> CareerSuggestion {
    rules.evaluate(profile).cloned().unwrap_or(FALLBACK)
}
