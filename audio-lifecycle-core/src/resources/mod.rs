pub mod bundle_loader;
