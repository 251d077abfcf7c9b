//! Built-in coordinates for common US cities.
//!
//! Consulted when every geocoding provider fails or geocoding is disabled.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::GeocodeResult;
use crate::lead::Coordinates;

/// `(lowercase key, latitude, longitude, display name)`.
const CITIES: &[(&str, f64, f64, &str)] = &[
    ("philadelphia", 39.9526, -75.1652, "Philadelphia, PA, USA"),
    ("new york", 40.7128, -74.0060, "New York, NY, USA"),
    ("los angeles", 34.0522, -118.2437, "Los Angeles, CA, USA"),
    ("chicago", 41.8781, -87.6298, "Chicago, IL, USA"),
    ("houston", 29.7604, -95.3698, "Houston, TX, USA"),
    ("phoenix", 33.4484, -112.0740, "Phoenix, AZ, USA"),
    ("san antonio", 29.4241, -98.4936, "San Antonio, TX, USA"),
    ("san diego", 32.7157, -117.1611, "San Diego, CA, USA"),
    ("dallas", 32.7767, -96.7970, "Dallas, TX, USA"),
    ("san jose", 37.3382, -121.8863, "San Jose, CA, USA"),
    ("austin", 30.2672, -97.7431, "Austin, TX, USA"),
    ("jacksonville", 30.3322, -81.6557, "Jacksonville, FL, USA"),
    ("fort worth", 32.7555, -97.3308, "Fort Worth, TX, USA"),
    ("columbus", 39.9612, -82.9988, "Columbus, OH, USA"),
    ("charlotte", 35.2271, -80.8431, "Charlotte, NC, USA"),
    ("san francisco", 37.7749, -122.4194, "San Francisco, CA, USA"),
    ("indianapolis", 39.7684, -86.1581, "Indianapolis, IN, USA"),
    ("seattle", 47.6062, -122.3321, "Seattle, WA, USA"),
    ("denver", 39.7392, -104.9903, "Denver, CO, USA"),
    ("washington", 38.9072, -77.0369, "Washington, DC, USA"),
    ("boston", 42.3601, -71.0589, "Boston, MA, USA"),
    ("el paso", 31.7619, -106.4850, "El Paso, TX, USA"),
    ("detroit", 42.3314, -83.0458, "Detroit, MI, USA"),
    ("nashville", 36.1627, -86.7816, "Nashville, TN, USA"),
    ("portland", 45.5152, -122.6784, "Portland, OR, USA"),
    ("memphis", 35.1495, -90.0490, "Memphis, TN, USA"),
    ("oklahoma city", 35.4676, -97.5164, "Oklahoma City, OK, USA"),
    ("las vegas", 36.1699, -115.1398, "Las Vegas, NV, USA"),
    ("louisville", 38.2527, -85.7585, "Louisville, KY, USA"),
    ("baltimore", 39.2904, -76.6122, "Baltimore, MD, USA"),
    ("milwaukee", 43.0389, -87.9065, "Milwaukee, WI, USA"),
    ("albuquerque", 35.0844, -106.6504, "Albuquerque, NM, USA"),
    ("tucson", 32.2226, -110.9747, "Tucson, AZ, USA"),
    ("fresno", 36.7378, -119.7871, "Fresno, CA, USA"),
    ("sacramento", 38.5816, -121.4944, "Sacramento, CA, USA"),
    ("kansas city", 39.0997, -94.5786, "Kansas City, MO, USA"),
    ("mesa", 33.4152, -111.8315, "Mesa, AZ, USA"),
    ("atlanta", 33.7490, -84.3880, "Atlanta, GA, USA"),
    ("omaha", 41.2565, -95.9345, "Omaha, NE, USA"),
    ("colorado springs", 38.8339, -104.8214, "Colorado Springs, CO, USA"),
    ("raleigh", 35.7796, -78.6382, "Raleigh, NC, USA"),
    ("virginia beach", 36.8529, -75.9780, "Virginia Beach, VA, USA"),
    ("long beach", 33.7701, -118.1937, "Long Beach, CA, USA"),
    ("miami", 25.7617, -80.1918, "Miami, FL, USA"),
    ("oakland", 37.8044, -122.2712, "Oakland, CA, USA"),
    ("minneapolis", 44.9778, -93.2650, "Minneapolis, MN, USA"),
    ("tulsa", 36.1540, -95.9928, "Tulsa, OK, USA"),
    ("cleveland", 41.4993, -81.6944, "Cleveland, OH, USA"),
    ("wichita", 37.6872, -97.3301, "Wichita, KS, USA"),
    ("arlington", 32.7357, -97.1081, "Arlington, TX, USA"),
    ("new orleans", 29.9511, -90.0715, "New Orleans, LA, USA"),
    ("bakersfield", 35.3733, -119.0187, "Bakersfield, CA, USA"),
    ("tampa", 27.9506, -82.4572, "Tampa, FL, USA"),
    ("honolulu", 21.3099, -157.8581, "Honolulu, HI, USA"),
    ("anaheim", 33.8366, -117.9143, "Anaheim, CA, USA"),
    ("aurora", 39.7294, -104.8319, "Aurora, CO, USA"),
    ("santa ana", 33.7455, -117.8677, "Santa Ana, CA, USA"),
    ("st. louis", 38.6270, -90.1994, "St. Louis, MO, USA"),
    ("riverside", 33.9533, -117.3962, "Riverside, CA, USA"),
    ("corpus christi", 27.8006, -97.3964, "Corpus Christi, TX, USA"),
    ("lexington", 38.0406, -84.5037, "Lexington, KY, USA"),
    ("pittsburgh", 40.4406, -79.9959, "Pittsburgh, PA, USA"),
    ("anchorage", 61.2181, -149.9003, "Anchorage, AK, USA"),
    ("stockton", 37.9577, -121.2908, "Stockton, CA, USA"),
    ("cincinnati", 39.1031, -84.5120, "Cincinnati, OH, USA"),
    ("st. paul", 44.9537, -93.0900, "St. Paul, MN, USA"),
    ("toledo", 41.6528, -83.5379, "Toledo, OH, USA"),
    ("newark", 40.7357, -74.1724, "Newark, NJ, USA"),
    ("greensboro", 36.0726, -79.7920, "Greensboro, NC, USA"),
    ("plano", 33.0198, -96.6989, "Plano, TX, USA"),
    ("henderson", 36.0395, -114.9817, "Henderson, NV, USA"),
    ("lincoln", 40.8136, -96.7026, "Lincoln, NE, USA"),
    ("buffalo", 42.8864, -78.8784, "Buffalo, NY, USA"),
    ("jersey city", 40.7178, -74.0431, "Jersey City, NJ, USA"),
    ("chula vista", 32.6401, -117.0842, "Chula Vista, CA, USA"),
    ("fort wayne", 41.0793, -85.1394, "Fort Wayne, IN, USA"),
    ("orlando", 28.5383, -81.3792, "Orlando, FL, USA"),
    ("st. petersburg", 27.7676, -82.6403, "St. Petersburg, FL, USA"),
    ("chandler", 33.3062, -111.8413, "Chandler, AZ, USA"),
    ("laredo", 27.5106, -99.5075, "Laredo, TX, USA"),
    ("norfolk", 36.8508, -76.2859, "Norfolk, VA, USA"),
    ("durham", 35.9940, -78.8986, "Durham, NC, USA"),
    ("madison", 43.0731, -89.4012, "Madison, WI, USA"),
    ("lubbock", 33.5779, -101.8552, "Lubbock, TX, USA"),
    ("irvine", 33.6846, -117.8265, "Irvine, CA, USA"),
    ("winston-salem", 36.0999, -80.2442, "Winston-Salem, NC, USA"),
    ("glendale", 33.5387, -112.1860, "Glendale, AZ, USA"),
    ("garland", 32.9126, -96.6389, "Garland, TX, USA"),
    ("hialeah", 25.8576, -80.2781, "Hialeah, FL, USA"),
    ("reno", 39.5296, -119.8138, "Reno, NV, USA"),
    ("chesapeake", 36.8190, -76.2750, "Chesapeake, VA, USA"),
    ("gilbert", 33.3528, -111.7890, "Gilbert, AZ, USA"),
    ("baton rouge", 30.4515, -91.1871, "Baton Rouge, LA, USA"),
    ("irving", 32.8140, -96.9489, "Irving, TX, USA"),
    ("scottsdale", 33.4942, -111.9261, "Scottsdale, AZ, USA"),
    ("north las vegas", 36.1989, -115.1175, "North Las Vegas, NV, USA"),
    ("fremont", 37.5485, -121.9886, "Fremont, CA, USA"),
    ("boise", 43.6150, -116.2023, "Boise, ID, USA"),
    ("richmond", 37.5407, -77.4360, "Richmond, VA, USA"),
    ("san bernardino", 34.1083, -117.2898, "San Bernardino, CA, USA"),
    ("birmingham", 33.5207, -86.8025, "Birmingham, AL, USA"),
    ("spokane", 47.6587, -117.4260, "Spokane, WA, USA"),
    ("rochester", 43.1566, -77.6088, "Rochester, NY, USA"),
    ("des moines", 41.5868, -93.6250, "Des Moines, IA, USA"),
    ("modesto", 37.6391, -120.9969, "Modesto, CA, USA"),
    ("fayetteville", 35.0527, -78.8784, "Fayetteville, NC, USA"),
    ("tacoma", 47.2529, -122.4443, "Tacoma, WA, USA"),
    ("oxnard", 34.1975, -119.1771, "Oxnard, CA, USA"),
    ("fontana", 34.0922, -117.4350, "Fontana, CA, USA"),
    ("montgomery", 32.3668, -86.3000, "Montgomery, AL, USA"),
    ("moreno valley", 33.9425, -117.2297, "Moreno Valley, CA, USA"),
    ("shreveport", 32.5252, -93.7502, "Shreveport, LA, USA"),
    ("yonkers", 40.9312, -73.8988, "Yonkers, NY, USA"),
    ("akron", 41.0814, -81.5190, "Akron, OH, USA"),
    ("huntington beach", 33.6595, -117.9988, "Huntington Beach, CA, USA"),
    ("little rock", 34.7465, -92.2896, "Little Rock, AR, USA"),
    ("augusta", 33.4735, -82.0105, "Augusta, GA, USA"),
    ("amarillo", 35.2220, -101.8313, "Amarillo, TX, USA"),
    ("mobile", 30.6954, -88.0399, "Mobile, AL, USA"),
    ("grand rapids", 42.9634, -85.6681, "Grand Rapids, MI, USA"),
    ("salt lake city", 40.7608, -111.8910, "Salt Lake City, UT, USA"),
    ("tallahassee", 30.4518, -84.2807, "Tallahassee, FL, USA"),
    ("huntsville", 34.7304, -86.5861, "Huntsville, AL, USA"),
    ("grand prairie", 32.7460, -96.9978, "Grand Prairie, TX, USA"),
    ("knoxville", 35.9606, -83.9207, "Knoxville, TN, USA"),
    ("worcester", 42.2626, -71.8023, "Worcester, MA, USA"),
    ("newport news", 37.0871, -76.4730, "Newport News, VA, USA"),
    ("brownsville", 25.9018, -97.4975, "Brownsville, TX, USA"),
    ("overland park", 38.9822, -94.6708, "Overland Park, KS, USA"),
    ("santa clarita", 34.3917, -118.5426, "Santa Clarita, CA, USA"),
    ("providence", 41.8240, -71.4128, "Providence, RI, USA"),
    ("garden grove", 33.7739, -117.9415, "Garden Grove, CA, USA"),
    ("chattanooga", 35.0456, -85.3097, "Chattanooga, TN, USA"),
    ("oceanside", 33.1959, -117.3795, "Oceanside, CA, USA"),
    ("jackson", 32.2988, -90.1848, "Jackson, MS, USA"),
    ("fort lauderdale", 26.1224, -80.1373, "Fort Lauderdale, FL, USA"),
    ("santa rosa", 38.4404, -122.7144, "Santa Rosa, CA, USA"),
    ("rancho cucamonga", 34.1064, -117.5931, "Rancho Cucamonga, CA, USA"),
    ("port st. lucie", 27.2939, -80.3501, "Port St. Lucie, FL, USA"),
    ("tempe", 33.4255, -111.9400, "Tempe, AZ, USA"),
    ("ontario", 34.0633, -117.6509, "Ontario, CA, USA"),
    ("vancouver", 45.6387, -122.6615, "Vancouver, WA, USA"),
    ("cape coral", 26.5629, -81.9495, "Cape Coral, FL, USA"),
    ("sioux falls", 43.5446, -96.7311, "Sioux Falls, SD, USA"),
    ("springfield", 37.2153, -93.2982, "Springfield, MO, USA"),
    ("peoria", 40.6936, -89.5890, "Peoria, IL, USA"),
    ("pembroke pines", 26.0073, -80.2962, "Pembroke Pines, FL, USA"),
    ("elk grove", 38.4088, -121.3716, "Elk Grove, CA, USA"),
    ("salem", 44.9429, -123.0351, "Salem, OR, USA"),
    ("lancaster", 34.6868, -118.1542, "Lancaster, CA, USA"),
    ("corona", 33.8753, -117.5664, "Corona, CA, USA"),
    ("eugene", 44.0521, -123.0868, "Eugene, OR, USA"),
    ("palmdale", 34.5794, -118.1165, "Palmdale, CA, USA"),
    ("salinas", 36.6777, -121.6555, "Salinas, CA, USA"),
    ("pasadena", 34.1478, -118.1445, "Pasadena, CA, USA"),
    ("fort collins", 40.5853, -105.0844, "Fort Collins, CO, USA"),
    ("hayward", 37.6688, -122.0808, "Hayward, CA, USA"),
    ("pomona", 34.0552, -117.7500, "Pomona, CA, USA"),
    ("cary", 35.7915, -78.7811, "Cary, NC, USA"),
    ("rockford", 42.2711, -89.0940, "Rockford, IL, USA"),
    ("alexandria", 38.8048, -77.0469, "Alexandria, VA, USA"),
    ("escondido", 33.1192, -117.0864, "Escondido, CA, USA"),
    ("mckinney", 33.1972, -96.6397, "McKinney, TX, USA"),
    ("joliet", 41.5250, -88.0817, "Joliet, IL, USA"),
    ("sunnyvale", 37.3688, -122.0363, "Sunnyvale, CA, USA"),
    ("torrance", 33.8358, -118.3406, "Torrance, CA, USA"),
    ("bridgeport", 41.1865, -73.1952, "Bridgeport, CT, USA"),
    ("lakewood", 39.7047, -105.0814, "Lakewood, CO, USA"),
    ("hollywood", 26.0112, -80.1495, "Hollywood, FL, USA"),
    ("paterson", 40.9168, -74.1718, "Paterson, NJ, USA"),
    ("naperville", 41.7508, -88.1535, "Naperville, IL, USA"),
    ("syracuse", 43.0481, -76.1474, "Syracuse, NY, USA"),
    ("mesquite", 32.7668, -96.5991, "Mesquite, TX, USA"),
    ("dayton", 39.7589, -84.1916, "Dayton, OH, USA"),
    ("savannah", 32.0835, -81.0998, "Savannah, GA, USA"),
    ("clarksville", 36.5298, -87.3595, "Clarksville, TN, USA"),
    ("orange", 33.7879, -117.8531, "Orange, CA, USA"),
    ("fullerton", 33.8704, -117.9242, "Fullerton, CA, USA"),
    ("killeen", 31.1171, -97.7278, "Killeen, TX, USA"),
    ("frisco", 33.1507, -96.8236, "Frisco, TX, USA"),
    ("hampton", 37.0299, -76.3452, "Hampton, VA, USA"),
    ("mcallen", 26.2034, -98.2300, "McAllen, TX, USA"),
    ("warren", 42.5145, -83.0146, "Warren, MI, USA"),
    ("bellevue", 47.6101, -122.2015, "Bellevue, WA, USA"),
    ("west valley city", 40.6916, -112.0011, "West Valley City, UT, USA"),
    ("columbia", 34.0007, -81.0348, "Columbia, SC, USA"),
    ("olathe", 38.8814, -94.8191, "Olathe, KS, USA"),
    ("sterling heights", 42.5803, -83.0302, "Sterling Heights, MI, USA"),
    ("new haven", 41.3083, -72.9279, "New Haven, CT, USA"),
    ("miramar", 25.9873, -80.2322, "Miramar, FL, USA"),
    ("waco", 31.5494, -97.1466, "Waco, TX, USA"),
    ("thousand oaks", 34.1706, -118.8376, "Thousand Oaks, CA, USA"),
    ("cedar rapids", 41.9778, -91.6656, "Cedar Rapids, IA, USA"),
    ("charleston", 32.7765, -79.9311, "Charleston, SC, USA"),
    ("visalia", 36.3302, -119.2921, "Visalia, CA, USA"),
    ("topeka", 39.0473, -95.6890, "Topeka, KS, USA"),
    ("elizabeth", 40.6640, -74.2107, "Elizabeth, NJ, USA"),
    ("gainesville", 29.6516, -82.3248, "Gainesville, FL, USA"),
    ("thornton", 39.8681, -104.9719, "Thornton, CO, USA"),
    ("roseville", 38.7521, -121.2880, "Roseville, CA, USA"),
    ("carrollton", 32.9537, -96.8903, "Carrollton, TX, USA"),
    ("coral springs", 26.2712, -80.2706, "Coral Springs, FL, USA"),
    ("stamford", 41.0534, -73.5387, "Stamford, CT, USA"),
    ("simi valley", 34.2694, -118.7815, "Simi Valley, CA, USA"),
    ("concord", 37.9780, -122.0311, "Concord, CA, USA"),
    ("hartford", 41.7658, -72.6734, "Hartford, CT, USA"),
    ("kent", 47.3809, -122.2348, "Kent, WA, USA"),
    ("lafayette", 30.2241, -92.0198, "Lafayette, LA, USA"),
    ("midland", 31.9974, -102.0779, "Midland, TX, USA"),
    ("surprise", 33.6292, -112.3679, "Surprise, AZ, USA"),
    ("denton", 33.2148, -97.1331, "Denton, TX, USA"),
    ("victorville", 34.5362, -117.2911, "Victorville, CA, USA"),
    ("evansville", 37.9716, -87.5710, "Evansville, IN, USA"),
    ("santa clara", 37.3541, -121.9552, "Santa Clara, CA, USA"),
    ("abilene", 32.4487, -99.7331, "Abilene, TX, USA"),
    ("athens", 33.9519, -83.3576, "Athens, GA, USA"),
    ("vallejo", 38.1041, -122.2566, "Vallejo, CA, USA"),
    ("allentown", 40.6084, -75.4902, "Allentown, PA, USA"),
    ("norman", 35.2226, -97.4395, "Norman, OK, USA"),
    ("beaumont", 30.0802, -94.1266, "Beaumont, TX, USA"),
    ("independence", 39.0911, -94.4155, "Independence, MO, USA"),
    ("murfreesboro", 35.8456, -86.3903, "Murfreesboro, TN, USA"),
    ("ann arbor", 42.2808, -83.7430, "Ann Arbor, MI, USA"),
    ("berkeley", 37.8716, -122.2727, "Berkeley, CA, USA"),
    ("provo", 40.2338, -111.6585, "Provo, UT, USA"),
    ("el monte", 34.0686, -118.0276, "El Monte, CA, USA"),
    ("lansing", 42.3314, -84.5557, "Lansing, MI, USA"),
    ("fargo", 46.8772, -96.7898, "Fargo, ND, USA"),
    ("downey", 33.9401, -118.1326, "Downey, CA, USA"),
    ("costa mesa", 33.6411, -117.9187, "Costa Mesa, CA, USA"),
    ("wilmington", 34.2257, -77.9447, "Wilmington, NC, USA"),
    ("arvada", 39.8028, -105.0875, "Arvada, CO, USA"),
    ("inglewood", 33.9617, -118.3531, "Inglewood, CA, USA"),
    ("miami gardens", 25.9420, -80.2456, "Miami Gardens, FL, USA"),
    ("carlsbad", 33.1581, -117.3506, "Carlsbad, CA, USA"),
    ("westminster", 39.8367, -105.0372, "Westminster, CO, USA"),
    ("pearland", 29.5638, -95.2861, "Pearland, TX, USA"),
    ("clearwater", 27.9659, -82.8001, "Clearwater, FL, USA"),
    ("high point", 35.9557, -80.0053, "High Point, NC, USA"),
    ("west covina", 34.0686, -117.9390, "West Covina, CA, USA"),
    ("murrieta", 33.5539, -117.2139, "Murrieta, CA, USA"),
    ("manchester", 42.9956, -71.4548, "Manchester, NH, USA"),
    ("cambridge", 42.3736, -71.1097, "Cambridge, MA, USA"),
    ("antioch", 37.9857, -121.8058, "Antioch, CA, USA"),
    ("temecula", 33.4936, -117.1484, "Temecula, CA, USA"),
    ("nashua", 42.7654, -71.4676, "Nashua, NH, USA"),
    ("lowell", 42.6334, -71.3162, "Lowell, MA, USA"),
    ("pompano beach", 26.2379, -80.1248, "Pompano Beach, FL, USA"),
    ("citrus heights", 38.7071, -121.2811, "Citrus Heights, CA, USA"),
    ("macon", 32.8407, -83.6324, "Macon, GA, USA"),
    ("lewisville", 33.0462, -96.9942, "Lewisville, TX, USA"),
    ("south bend", 41.6764, -86.2520, "South Bend, IN, USA"),
    ("missoula", 46.8721, -113.9940, "Missoula, MT, USA"),
    ("sparks", 39.5349, -119.7527, "Sparks, NV, USA"),
    ("broken arrow", 36.0526, -95.7969, "Broken Arrow, OK, USA"),
    ("federal way", 47.3223, -122.3126, "Federal Way, WA, USA"),
    ("beaverton", 45.4871, -122.8037, "Beaverton, OR, USA"),
    ("livermore", 37.6819, -121.7680, "Livermore, CA, USA"),
    ("norwalk", 33.9022, -118.0817, "Norwalk, CA, USA"),
    ("redding", 40.5865, -122.3917, "Redding, CA, USA"),
    ("rialto", 34.1006, -117.3703, "Rialto, CA, USA"),
    ("davenport", 41.5236, -90.5776, "Davenport, IA, USA"),
    ("sunrise manor", 36.2110, -115.0731, "Sunrise Manor, NV, USA"),
    ("chico", 39.7285, -121.8375, "Chico, CA, USA"),
    ("las cruces", 32.3199, -106.7637, "Las Cruces, NM, USA"),
    ("greeley", 40.4233, -104.7091, "Greeley, CO, USA"),
    ("ventura", 34.2746, -119.2290, "Ventura, CA, USA"),
    ("south gate", 33.9548, -118.2120, "South Gate, CA, USA"),
    ("tyler", 32.3513, -95.3011, "Tyler, TX, USA"),
    ("hillsboro", 45.5229, -122.9890, "Hillsboro, OR, USA"),
    ("west jordan", 40.6097, -111.9391, "West Jordan, UT, USA"),
    ("billings", 45.7833, -108.5007, "Billings, MT, USA"),
    ("pueblo", 38.2544, -104.6091, "Pueblo, CO, USA"),
    ("daly city", 37.7058, -122.4622, "Daly City, CA, USA"),
    ("allen", 33.1031, -96.6706, "Allen, TX, USA"),
    ("boulder", 40.0150, -105.2705, "Boulder, CO, USA"),
    ("santa maria", 34.9530, -120.4357, "Santa Maria, CA, USA"),
    ("woodbridge", 38.6581, -77.2497, "Woodbridge, VA, USA"),
];

lazy_static! {
    static ref CITY_INDEX: HashMap<&'static str, (f64, f64, &'static str)> = CITIES
        .iter()
        .map(|&(key, lat, lon, name)| (key, (lat, lon, name)))
        .collect();
}

/// Look up a place in the built-in table (case-insensitive, trimmed).
#[must_use]
pub fn lookup(query: &str) -> Option<GeocodeResult> {
    let key = query.trim().to_lowercase();
    let &(lat, lon, name) = CITY_INDEX.get(key.as_str())?;
    Some(GeocodeResult {
        coordinates: Coordinates::new(lat, lon)?,
        display_name: name.to_string(),
    })
}

/// Number of places in the built-in table.
#[must_use]
pub fn len() -> usize {
    CITY_INDEX.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_city() {
        let result = lookup("Philadelphia").unwrap();
        assert_eq!(result.display_name, "Philadelphia, PA, USA");
        assert!((result.coordinates.latitude - 39.9526).abs() < 1e-9);
        assert!((result.coordinates.longitude + 75.1652).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_trims_and_ignores_case() {
        assert!(lookup("  NEW YORK ").is_some());
        assert!(lookup("st. louis").is_some());
    }

    #[test]
    fn test_lookup_smaller_cities() {
        let tyler = lookup("Tyler").unwrap();
        assert_eq!(tyler.display_name, "Tyler, TX, USA");
        assert!((tyler.coordinates.latitude - 32.3513).abs() < 1e-9);

        let boulder = lookup("boulder").unwrap();
        assert_eq!(boulder.display_name, "Boulder, CO, USA");
        assert!((boulder.coordinates.longitude + 105.2705).abs() < 1e-9);

        for city in ["allen", "south bend", "missoula", "ventura", "woodbridge"] {
            assert!(lookup(city).is_some(), "{city}");
        }
        assert_eq!(len(), 278);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("Atlantis").is_none());
        assert!(lookup("Philadelphia, PA").is_none());
    }

    #[test]
    fn test_keys_are_unique_and_valid() {
        assert_eq!(len(), CITIES.len());
        for &(key, lat, lon, _) in CITIES {
            assert_eq!(key, key.to_lowercase());
            assert!(Coordinates::new(lat, lon).is_some(), "{key}");
        }
    }
}
