//! Candidate queries offered in the dropdown.

/// Comma-delimited list of sample searches.
pub const SEARCH_INPUTS: &str = "best noise cancelling headphones 2024, new iphone release date, \
comparison between RTX 4080 and 4090, latest MacBook Pro specs, best mechanical keyboards for gaming, \
AI powered photo editing software, virtual reality headset reviews, smart home automation systems, \
wireless charging pad for multiple devices, best deals on 4k TVs, new android phone releases, \
portable bluetooth speakers with long battery life, gaming laptop under $1500, \
best cybersecurity software for home use, cloud storage comparison, how to build a gaming pc, \
best vpn services for streaming, smartwatches with fitness tracking, drone photography tips, \
3d printing for beginners";

/// Split a comma-delimited list into trimmed, non-empty options.
pub fn split_queries(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn candidate_queries() -> Vec<String> {
    split_queries(SEARCH_INPUTS)
}
