//! User-facing message catalog (Indonesian).
//!
//! Every message a client can see lives here; handlers and errors never
//! hardcode response text.

pub const REQUIRED_FIELDS: &str = "Nama, Kategori, Harga, dan Stok diperlukan!";
pub const INVALID_DATA: &str = "Data tidak valid";
pub const PRODUCT_EXISTS: &str = "Produk sudah ada";
pub const PRODUCT_NOT_FOUND: &str = "Produk tidak ditemukan";
pub const CATEGORY_NOT_FOUND: &str = "Kategori tidak ditemukan";
pub const PRODUCT_DEACTIVATED: &str = "Produk dinonaktifkan";
pub const PRODUCT_DELETED: &str = "Produk dihapus";
