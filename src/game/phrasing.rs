//! Question wording: the plain symbolic form and the story-style word problems.

const MULTIPLICATION_STORIES: &[&str] = &[
    "A box holds {units} apples. How many apples are in {groups} boxes?",
    "There are {units} students in each row. How many students are in {groups} rows?",
    "A bag holds {units} chocolates. How many chocolates are in {groups} bags?",
    "A bouquet has {units} flowers. How many flowers are in {groups} bouquets?",
    "A bundle has {units} pencils. How many pencils are in {groups} bundles?",
];

const EXACT_DIVISION_STORIES: &[&str] = &[
    "{dividend} candies are shared equally by {divisor} friends. How many candies does each friend get?",
    "{dividend} students are split into teams of {divisor}. How many teams are there?",
    "{dividend} loaves of bread are packed {divisor} to a box. How many boxes are needed?",
    "{dividend} flowers are tied into bunches of {divisor}. How many bunches are there?",
];

const REMAINDER_DIVISION_STORIES: &[&str] = &[
    "{dividend} candies are shared equally by {divisor} friends. How many does each friend get, and how many are left over?",
    "{dividend} loaves of bread are packed {divisor} to a box. How many full boxes are there, and how many loaves are left over?",
];

pub fn multiplication_story_count() -> usize {
    MULTIPLICATION_STORIES.len()
}

pub fn division_story_count(has_remainder: bool) -> usize {
    if has_remainder {
        REMAINDER_DIVISION_STORIES.len()
    } else {
        EXACT_DIVISION_STORIES.len()
    }
}

pub fn multiplication_story(index: usize, units: u32, groups: u32) -> String {
    MULTIPLICATION_STORIES[index % MULTIPLICATION_STORIES.len()]
        .replace("{units}", &units.to_string())
        .replace("{groups}", &groups.to_string())
}

pub fn division_story(index: usize, dividend: u32, divisor: u32, has_remainder: bool) -> String {
    let templates = if has_remainder {
        REMAINDER_DIVISION_STORIES
    } else {
        EXACT_DIVISION_STORIES
    };
    templates[index % templates.len()]
        .replace("{dividend}", &dividend.to_string())
        .replace("{divisor}", &divisor.to_string())
}
