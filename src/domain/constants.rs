//! Site characteristics and domain constants
//!
//! Ozon-specific URLs, characteristic keys and page markers live here so the
//! rest of the crate never hardcodes them.

/// Ozon site constants
pub mod site {
    /// Site home page, also sent as `Referer`
    pub const BASE_URL: &str = "https://www.ozon.ru/";

    /// Product detail page URL template (SKU placeholder: `{sku}`)
    pub const PRODUCT_URL_TEMPLATE: &str = "https://www.ozon.ru/product/{sku}/";

    /// Placeholder substituted by the product identifier
    pub const SKU_PLACEHOLDER: &str = "{sku}";
}

/// Characteristic names used for the derived record fields
pub mod characteristics {
    /// Product type
    pub const TYPE: &str = "Тип";

    /// Country of origin
    pub const COUNTRY_OF_ORIGIN: &str = "Страна-изготовитель";

    /// Manufacturer part number, preferred key
    pub const MANUFACTURER_PART_NUMBER: &str = "Партномер (артикул производителя)";

    /// Manufacturer part number, fallback key
    pub const ARTICLE: &str = "Артикул";
}

/// Phrases that only appear on anti-bot / access restriction pages
pub mod blocking {
    /// "Access restricted"
    pub const ACCESS_RESTRICTED: &str = "Доступ ограничен";

    /// "Security check"
    pub const SECURITY_CHECK: &str = "Проверка безопасности";

    /// Default marker list
    pub const DEFAULT_MARKERS: [&str; 2] = [ACCESS_RESTRICTED, SECURITY_CHECK];
}

/// Image URL rewriting
pub mod images {
    /// Thumbnail size path segment, e.g. `/wc50/`
    pub const THUMBNAIL_SEGMENT_PATTERN: &str = r"/wc\d+/";

    /// High resolution replacement segment
    pub const HIGH_RES_SEGMENT: &str = "/wc1000/";
}
