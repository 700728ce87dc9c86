pub mod resource_page;
