mod fill;
mod io;
