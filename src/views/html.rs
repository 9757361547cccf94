//! Page shell and text escaping shared by the HTML views.

use std::fmt::Write;

use crate::models::Locale;

/// Escapes text for element content and double-quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a path segment or query value
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Rules the rendered markup relies on: skeleton overlay, hidden fallbacks, grids.
const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#111;color:#eee}\
a{color:inherit}\
[hidden]{display:none!important}\
.site-header{display:flex;justify-content:space-between;align-items:center;padding:1rem 2rem}\
.brand{font-size:1.5rem;font-weight:700;text-decoration:none}\
.language-switcher a{margin-left:.75rem}\
.language-switcher a[aria-current]{font-weight:700}\
main{padding:0 2rem 2rem}\
.movie-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(160px,1fr));gap:1rem}\
.movie-image{position:relative;aspect-ratio:2/3;overflow:hidden;border-radius:.5rem;background:#222}\
.movie-image img{width:100%;height:100%;object-fit:cover}\
.skeleton{position:absolute;inset:0;background:linear-gradient(90deg,#222,#333,#222);background-size:200% 100%;animation:pulse 1.5s infinite}\
.movie.loading,.where-to-watch.loading{position:relative;min-height:6rem}\
.image-unavailable{display:flex;align-items:center;justify-content:center;height:100%;color:#888}\
.backdrop{width:100%;max-height:60vh;object-fit:cover}\
.poster{width:240px;height:auto;float:left;margin:0 1.5rem 1rem 0}\
.badge{display:inline-block;padding:.2rem .6rem;margin:0 .4rem .4rem 0;border:1px solid #555;border-radius:1rem}\
.badges{display:flex;gap:2rem;flex-wrap:wrap}\
.provider-logo{border-radius:.5rem;margin-right:.5rem}\
.error{color:#f66}\
.separator{clear:both;border-color:#333}\
@keyframes pulse{0%{background-position:200% 0}100%{background-position:-200% 0}}";

/// Replaces every loading region with the markup served at its `data-src`.
const REGION_LOADER: &str = "\
document.querySelectorAll('[data-src]').forEach(function(el){\
fetch(el.dataset.src,{credentials:'same-origin'})\
.then(function(r){return r.text();})\
.then(function(html){el.outerHTML=html;})\
.catch(function(){});});";

/// Wraps page content in the document shell: header with language switcher, main,
/// attribution footer.
pub fn layout(locale: Locale, title: &str, content: &str) -> String {
    let strings = locale.strings();
    let mut page = String::with_capacity(content.len() + 2048);

    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="{lang}" class="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header class="site-header">
<a href="/" class="brand">cinefind</a>
<nav class="language-switcher" aria-label="{language_label}">
<a href="/language/en" hreflang="en"{en_current}>{english}</a>
<a href="/language/es_AR" hreflang="es-AR"{es_current}>{spanish}</a>
</nav>
</header>
<main>
{content}
</main>
<footer>
<p>This website uses TMDB and the TMDB APIs but is not endorsed, certified, or otherwise approved by TMDB. It also uses JustWatch.</p>
</footer>
<script>{script}</script>
</body>
</html>
"#,
        lang = locale.language_tag(),
        title = escape(title),
        language_label = escape(strings.language_label),
        english = escape(strings.english),
        spanish = escape(strings.spanish),
        en_current = current_marker(locale == Locale::En),
        es_current = current_marker(locale == Locale::EsAr),
        content = content,
        style = STYLE,
        script = REGION_LOADER,
    );

    page
}

fn current_marker(current: bool) -> &'static str {
    if current {
        r#" aria-current="true""#
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("tt0816692"), "tt0816692");
        assert_eq!(encode("a/b c"), "a%2Fb%20c");
        assert_eq!(encode("amélie & co"), "am%C3%A9lie%20%26%20co");
    }

    #[test]
    fn test_layout_sets_lang_and_marks_current_locale() {
        let page = layout(Locale::EsAr, "Título <x>", "<p>hola</p>");
        assert!(page.contains(r#"<html lang="es-AR""#));
        assert!(page.contains("<title>Título &lt;x&gt;</title>"));
        assert!(page.contains(r#"hreflang="es-AR" aria-current="true""#));
        assert!(page.contains("<p>hola</p>"));
    }

    #[test]
    fn test_layout_is_self_contained() {
        let page = layout(Locale::En, "cinefind", "");
        assert!(page.contains("<style>"));
        assert!(page.contains("[hidden]{display:none!important}"));
        assert!(page.contains(".skeleton{"));
        assert!(page.contains("querySelectorAll('[data-src]')"));
        assert!(!page.contains("<img"));
    }
}
