mod tests_failure_report;
mod tests_grammar;
