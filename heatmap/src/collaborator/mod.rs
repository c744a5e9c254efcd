mod geocoder;
mod isochrone_provider;
mod nominatim_geocoder;
mod otp_isochrone_provider;

pub use geocoder::Geocoder;
pub use isochrone_provider::IsochroneProvider;
pub use nominatim_geocoder::NominatimGeocoder;
pub use otp_isochrone_provider::{parse_isochrone_response, OtpIsochroneProvider};
