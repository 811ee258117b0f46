pub mod affiliate_click;
pub mod cart_item;
pub mod newsletter_subscriber;
pub mod product;
pub mod profile;
pub mod saved_product;

pub use affiliate_click::Entity as AffiliateClickEntity;
pub use cart_item::Entity as CartItemEntity;
pub use newsletter_subscriber::Entity as NewsletterSubscriberEntity;
pub use product::Entity as ProductEntity;
pub use profile::Entity as ProfileEntity;
pub use saved_product::Entity as SavedProductEntity;
