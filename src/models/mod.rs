//! Data models for the travel search API
//!
//! Normalized result types are shared by every provider of a capability:
//! - Destination / Attraction: places and points of interest
//! - Hotel: listings, rates and price calendars
//! - Flight: offers with segments and layovers
//! - Insight: inspiration, analytics and activities
//! - Guide: destination overviews and travel tips
//! - Query: validated search inputs

pub mod airport;
pub mod destination;
pub mod flight;
pub mod guide;
pub mod hotel;
pub mod insight;
pub mod location;
pub mod query;

pub use airport::Airport;
pub use destination::{Attraction, AttractionDetails, Destination};
pub use flight::{Flight, FlightSegment, Layover};
pub use guide::{DestinationGuide, TipSection, TravelTips};
pub use hotel::{BestRate, Hotel, HotelHeatmap, HotelPricing, PriceHeatmap, RateQuote};
pub use insight::{
    Activity, CheapestDate, FlightDestination, RawDocument, RecommendedLocation,
    TraveledDestination,
};
pub use location::GeoPoint;
pub use query::{
    AttractionQuery, CabinClass, DestinationQuery, FlightQuery, HotelQuery, is_iata_code, is_place_id,
};
