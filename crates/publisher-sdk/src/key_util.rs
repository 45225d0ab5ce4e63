/// Object key helpers.
///
/// Keys are always `/`-separated regardless of the host platform.
pub struct KeyUtil;

impl KeyUtil {
    /// Join key segments with `/`.
    ///
    /// Leading and trailing slashes are trimmed from every segment and empty
    /// segments are skipped, so `join(&["", "/lambda/", "pkg.zip"])` yields
    /// `lambda/pkg.zip`.
    pub fn join(parts: &[&str]) -> String {
        parts
            .iter()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Normalise a key prefix so it ends with exactly one `/`.
    ///
    /// An empty (or all-slash) prefix stays empty, which lists the whole bucket.
    pub fn as_prefix(prefix: &str) -> String {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_trims_and_skips_empty() {
        assert_eq!(KeyUtil::join(&["", "/lambda/", "pkg.zip"]), "lambda/pkg.zip");
        assert_eq!(KeyUtil::join(&["tfm/", "layers", "layer.zip"]), "tfm/layers/layer.zip");
        assert_eq!(KeyUtil::join(&["/", ""]), "");
    }

    #[test]
    fn as_prefix_adds_single_trailing_slash() {
        assert_eq!(KeyUtil::as_prefix("plantillas"), "plantillas/");
        assert_eq!(KeyUtil::as_prefix("/root/plantillas//"), "root/plantillas/");
        assert_eq!(KeyUtil::as_prefix("//"), "");
    }
}
