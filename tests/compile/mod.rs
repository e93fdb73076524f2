mod tests_projection;
mod tests_words;
