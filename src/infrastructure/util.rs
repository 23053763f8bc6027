use crate::application::ports::util::SlugGenerator;
use slug::slugify;

/// ASCII slugs via the `slug` crate: lowercase, `-` separated.
#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        slugify(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_upload_names() {
        let slugger = DefaultSlugGenerator;
        assert_eq!(slugger.slugify("Über Uns.JPG"), "uber-uns-jpg");
        assert_eq!(slugger.slugify("  "), "");
    }
}
