use regex::{Regex, RegexBuilder};

use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// Build a case-insensitive matcher for a literal keyword.
pub fn keyword_regex(keyword: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
}

/// Tasks whose description contains `keyword`, ignoring case, paired with
/// their 1-based number in the full list.
pub fn find_tasks<'a>(
    list: &'a TaskList,
    keyword: &str,
) -> Result<Vec<(usize, &'a Task)>, regex::Error> {
    let re = keyword_regex(keyword)?;
    Ok(list
        .numbered()
        .filter(|(_, task)| re.is_match(task.description()))
        .collect())
}
