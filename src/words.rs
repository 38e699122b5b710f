use serde::{Deserialize, Serialize};

/// Word dealt to the Blank.
pub const BLANK_WORD: &str = "???";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordPair {
    pub civilian: &'static str,
    pub undercover: &'static str,
}

const fn pair(civilian: &'static str, undercover: &'static str) -> WordPair {
    WordPair { civilian, undercover }
}

/// Which catalog a session draws its pair from. Chosen before roles are dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordSource {
    #[default]
    Classic,
    Generated,
}

impl WordSource {
    pub fn catalog(&self) -> &'static [WordPair] {
        match self {
            WordSource::Classic => CLASSIC_PAIRS,
            WordSource::Generated => GENERATED_PAIRS,
        }
    }
}

pub const CLASSIC_PAIRS: &[WordPair] = &[
    pair("Cat", "Dog"),
    pair("Apple", "Banana"),
    pair("Car", "Bus"),
    pair("Chair", "Table"),
    pair("Sun", "Moon"),
    pair("Fish", "Shark"),
    pair("Pen", "Pencil"),
    pair("Book", "Notebook"),
    pair("Phone", "Tablet"),
    pair("Shoe", "Boot"),
    pair("Milk", "Juice"),
    pair("Pizza", "Burger"),
    pair("Ball", "Toy"),
    pair("Rain", "Snow"),
    pair("Dog", "Wolf"),
    pair("Tree", "Plant"),
    pair("Water", "Juice"),
    pair("Cake", "Pie"),
    pair("Egg", "Cheese"),
    pair("Cup", "Mug"),
    pair("School", "College"),
    pair("Desk", "Table"),
    pair("Window", "Door"),
    pair("Flower", "Rose"),
    pair("Bird", "Duck"),
    pair("Cow", "Horse"),
    pair("Hat", "Cap"),
    pair("Bike", "Scooter"),
    pair("Orange", "Grape"),
    pair("Sleep", "Nap"),
    pair("Walk", "Run"),
    pair("Happy", "Glad"),
    pair("Sad", "Crying"),
    pair("Hot", "Warm"),
    pair("Cold", "Cool"),
    pair("Laugh", "Smile"),
    pair("Cry", "Tears"),
    pair("Big", "Large"),
    pair("Small", "Tiny"),
    pair("Fast", "Quick"),
    pair("Slow", "Late"),
    pair("House", "Home"),
    pair("Boy", "Girl"),
    pair("Man", "Woman"),
    pair("Baby", "Kid"),
    pair("Father", "Mother"),
    pair("Brother", "Sister"),
    pair("Hand", "Foot"),
    pair("Eye", "Nose"),
    pair("Mouth", "Ear"),
    pair("Leg", "Arm"),
    pair("City", "Town"),
    pair("Street", "Road"),
    pair("Bus", "Train"),
    pair("Plane", "Helicopter"),
    pair("Key", "Lock"),
    pair("Door", "Gate"),
    pair("T-shirt", "Shirt"),
    pair("Socks", "Shoes"),
    pair("Bag", "Backpack"),
    pair("Clock", "Watch"),
    pair("TV", "Radio"),
    pair("Music", "Song"),
    pair("Dance", "Sing"),
    pair("Game", "Toy"),
    pair("Light", "Lamp"),
    pair("Dark", "Night"),
    pair("Morning", "Evening"),
    pair("Day", "Night"),
    pair("Week", "Month"),
    pair("Rainy", "Sunny"),
    pair("Summer", "Winter"),
    pair("Spring", "Autumn"),
    pair("Food", "Meal"),
    pair("Bread", "Toast"),
    pair("Rice", "Pasta"),
    pair("Meat", "Chicken"),
    pair("Fruit", "Vegetable"),
    pair("Salt", "Sugar"),
    pair("Ice", "Snow"),
    pair("Cupcake", "Muffin"),
    pair("Cookie", "Biscuit"),
    pair("Bed", "Pillow"),
    pair("Blanket", "Quilt"),
    pair("Window", "Curtain"),
    pair("Wall", "Door"),
    pair("Computer", "Laptop"),
    pair("Mouse", "Keyboard"),
    pair("Picture", "Photo"),
    pair("Drawing", "Painting"),
    pair("Zoo", "Farm"),
    pair("Lion", "Tiger"),
    pair("Elephant", "Rhino"),
    pair("Monkey", "Gorilla"),
    pair("Fox", "Wolf"),
    pair("Bear", "Panda"),
    pair("Snake", "Lizard"),
    pair("Frog", "Toad"),
    pair("Insect", "Bug"),
    pair("Spider", "Ant"),
];

pub const GENERATED_PAIRS: &[WordPair] = &[
    pair("Telescope", "Microscope"),
    pair("Waterfall", "Fountain"),
    pair("Skyscraper", "Lighthouse"),
    pair("Volcano", "Geyser"),
    pair("Symphony", "Melody"),
    pair("Labyrinth", "Maze"),
    pair("Avalanche", "Landslide"),
    pair("Constellation", "Horoscope"),
    pair("Tornado", "Hurricane"),
    pair("Expedition", "Voyage"),
];
