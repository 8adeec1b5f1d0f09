use iso639_core::{api::parse_dataset, export, LoadOptions};

fn main() {
    let registry = r#"
        <iso_639_3_entries>
            <iso_639_3_entry id="eng" part1_code="en" part2_code="eng"
                scope="I" type="L" name="English"/>
            <iso_639_3_entry id="lat" part1_code="la" part2_code="lat"
                scope="I" type="A" name="Latin"/>
        </iso_639_3_entries>
    "#;

    match parse_dataset(registry, "example.xml", LoadOptions::default()) {
        Ok(dataset) => {
            if let Some(latin) = dataset.lookup_by_part1("la") {
                println!("Found {latin}");
            }
            match export::render(&dataset, "json") {
                Ok(json) => println!("Successfully exported registry to JSON:\n{json}"),
                Err(e) => eprintln!("Failed to export: {e:?}"),
            }
        }
        Err(e) => {
            eprintln!("Failed to load registry: {:?}", miette::Report::new(e));
        }
    }
}
