//! Category and search filtering for the tool grid.

use super::descriptor::{Category, ToolDescriptor};

/// Returns true if `tool` should be listed for the given category and query.
///
/// The query matches case-insensitively as a substring of either the name or
/// the description. An empty query matches everything.
pub fn matches(tool: &ToolDescriptor, category: Category, query: &str) -> bool {
    let in_category = category == Category::All || tool.category == category;
    if !in_category {
        return false;
    }

    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    tool.name.to_lowercase().contains(&needle) || tool.description.to_lowercase().contains(&needle)
}

/// Filter `tools` by category and free-text query, preserving catalog order.
pub fn filter_tools<'a>(
    tools: &'a [ToolDescriptor],
    category: Category,
    query: &str,
) -> Vec<&'a ToolDescriptor> {
    tools
        .iter()
        .filter(|tool| matches(tool, category, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TOOLS;

    fn ids(tools: &[&ToolDescriptor]) -> Vec<&'static str> {
        tools.iter().map(|t| t.id).collect()
    }

    // =========================================================================
    // Category Filtering
    // =========================================================================

    #[test]
    fn test_all_with_empty_query_returns_everything_in_order() {
        let result = filter_tools(TOOLS, Category::All, "");
        assert_eq!(result.len(), TOOLS.len());
        assert_eq!(ids(&result), TOOLS.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_category() {
        let result = filter_tools(TOOLS, Category::ImageTools, "");
        assert_eq!(ids(&result), vec!["image-compressor", "color-palette"]);
    }

    #[test]
    fn test_category_without_tools_is_empty() {
        assert!(filter_tools(TOOLS, Category::PdfTools, "").is_empty());
    }

    // =========================================================================
    // Search Filtering
    // =========================================================================

    #[test]
    fn test_query_is_case_insensitive() {
        let lower = filter_tools(TOOLS, Category::All, "pdf");
        let upper = filter_tools(TOOLS, Category::All, "PDF");
        assert_eq!(ids(&lower), ids(&upper));
        assert!(ids(&lower).contains(&"pdf-merger"));
        assert!(ids(&lower).contains(&"images-to-pdf"));
    }

    #[test]
    fn test_query_matches_description_only() {
        // "submission" appears only in descriptions
        let result = filter_tools(TOOLS, Category::All, "submission");
        assert_eq!(ids(&result), vec!["zip-creator", "exam-countdown"]);
    }

    #[test]
    fn test_query_and_category_combine() {
        let result = filter_tools(TOOLS, Category::StudentKit, "pdf");
        assert_eq!(ids(&result), vec!["pdf-merger", "images-to-pdf"]);

        let result = filter_tools(TOOLS, Category::Security, "pdf");
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(filter_tools(TOOLS, Category::All, "xyzzy").is_empty());
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[test]
    fn test_result_is_subset_satisfying_predicate() {
        let queries = ["", "a", "PDF", "image", "calc", "zzz", "Tool", " "];
        for category in Category::all() {
            for query in queries {
                let result = filter_tools(TOOLS, category, query);
                for tool in &result {
                    assert!(TOOLS.iter().any(|t| t.id == tool.id));
                    assert!(category == Category::All || tool.category == category);
                    let q = query.to_lowercase();
                    assert!(
                        tool.name.to_lowercase().contains(&q)
                            || tool.description.to_lowercase().contains(&q)
                    );
                }
                // Nothing that satisfies the predicate is dropped.
                let expected = TOOLS.iter().filter(|t| matches(t, category, query)).count();
                assert_eq!(result.len(), expected);
            }
        }
    }
}
