/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe inline tags are kept, `<script>`, `<iframe>` and
/// event-handler attributes are stripped. Applied to admin-authored question
/// text before it is stored, since exam takers' clients render it.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
