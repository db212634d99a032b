//! Naming helpers for code generation

use inflector::Inflector;

/// Naming conventions used by the templates
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Upper-case the first character, leaving the rest untouched
    ///
    /// # Examples
    ///
    /// ```
    /// # use apiforge::generator::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::capitalize("firstName"), "FirstName");
    /// assert_eq!(TemplateHelpers::capitalize("url"), "Url");
    /// assert_eq!(TemplateHelpers::capitalize("URL"), "URL");
    /// ```
    #[must_use]
    pub fn capitalize(input: &str) -> String {
        let mut chars = input.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Convert string to camelCase
    ///
    /// # Examples
    ///
    /// ```
    /// # use apiforge::generator::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_camel_case("OrderLine"), "orderLine");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Pluralize a word
    ///
    /// # Examples
    ///
    /// ```
    /// # use apiforge::generator::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::pluralize("customer"), "customers");
    /// assert_eq!(TemplateHelpers::pluralize("category"), "categories");
    /// ```
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Base path of a REST resource (lower-cased plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use apiforge::generator::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_route_path("Customer"), "/customers");
    /// assert_eq!(TemplateHelpers::to_route_path("OrderLine"), "/orderlines");
    /// ```
    #[must_use]
    pub fn to_route_path(entity: &str) -> String {
        format!("/{}", Self::pluralize(&entity.to_lowercase()))
    }

    /// Name of a foreign-key member derived from a reference field
    ///
    /// # Examples
    ///
    /// ```
    /// # use apiforge::generator::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::foreign_key_name("customer"), "customerId");
    /// ```
    #[must_use]
    pub fn foreign_key_name(field: &str) -> String {
        format!("{field}Id")
    }
}
