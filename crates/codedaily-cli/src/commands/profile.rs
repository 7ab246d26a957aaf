use super::{open_machine, print_snapshot};

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let machine = open_machine()?;
    Ok(print_snapshot(&machine)?)
}

pub fn login(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = open_machine()?;
    machine.switch_user(name)?;
    Ok(print_snapshot(&machine)?)
}

pub fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = open_machine()?;
    machine.sign_out();
    Ok(print_snapshot(&machine)?)
}
