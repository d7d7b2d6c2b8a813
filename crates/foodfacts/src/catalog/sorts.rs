use crate::prelude::*;
use foodfacts_core::catalog::SortOption;

pub fn run() -> Result<()> {
    let mut table = new_table();
    table.set_titles(prettytable::row!["KEY", "LABEL"]);

    for option in SortOption::ALL {
        table.add_row(prettytable::row![option.key(), option.label()]);
    }

    table.printstd();

    Ok(())
}
